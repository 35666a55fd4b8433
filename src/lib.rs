//! # osow-conflict - Policy conflict detection for oversize/overweight moves
//!
//! Given the policies a rule engine matched against one load, this crate
//! explains how those policies interact: which ones compete for the same
//! requirement, which trigger on overlapping conditions, and which demand
//! things that cannot all be satisfied. It also merges the outputs of
//! cumulative facets (escorts, utility notices) into one effective
//! requirement per facet.
//!
//! ## Core Concepts
//!
//! - **MatchedPolicy**: A policy already known to apply, with its conditions and output
//! - **Facet**: A requirement dimension (escort, permit, route, ...) with a merge strategy
//! - **ConflictGroup**: Policies involved in one type overlap, condition overlap, or contradiction
//! - **ConflictAnalysis**: Every group plus the merged cumulative outputs
//!
//! ## Usage
//!
//! ```rust
//! use osow_conflict::{detect_conflicts, EscortRequirement, MatchedPolicy, PolicyKind};
//!
//! let policies = vec![
//!     MatchedPolicy::new("tx-escort", "TX escort", PolicyKind::Escort)
//!         .with_output(EscortRequirement::new(1, 0)),
//!     MatchedPolicy::new("tx-escort-wide", "TX wide escort", PolicyKind::Escort)
//!         .with_output(EscortRequirement::new(0, 1)),
//! ];
//!
//! let analysis = detect_conflicts(&policies);
//! assert!(!analysis.has_conflicts);
//! let escort = analysis.resolved(PolicyKind::Escort).and_then(|o| o.as_escort()).unwrap();
//! assert_eq!((escort.front_escorts, escort.rear_escorts), (1, 1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Input model
pub mod condition;
pub mod output;
pub mod policy;

// Configuration and errors
pub mod config;
pub mod error;
pub mod facet;

// Detection, merge, resolution
pub mod conflict;
pub mod detect;
pub mod engine;
pub mod merge;
pub mod resolution;
pub mod validation;

// Re-export primary types at crate root for convenience
pub use condition::{Attribute, Condition, ConditionValue, Interval, Operator, SetMember, TriggerDomain};
pub use config::EngineConfig;
pub use conflict::{
    ConflictAnalysis, ConflictCounts, ConflictGroup, ConflictGroupId, ConflictKind, Contradiction,
    ContradictionValue,
};
pub use detect::{ContradictionCheck, ContradictionDetector, PermitTypeCheck, RouteDirectionCheck};
pub use engine::{detect_conflicts, ConflictEngine};
pub use error::{ConfigError, EngineError, EngineResult, ValidationError};
pub use facet::{FacetConfig, FacetTable, MergeStrategy};
pub use merge::{merge_escort_requirements, merge_outputs, merge_utility_notice_requirements};
pub use output::{
    CostRange, DimensionRequirement, EscortRequirement, HoursRequirement, PermitRequirement, PolicyOutput,
    RouteRequirement, SpeedRequirement, UtilityNoticeRequirement,
};
pub use policy::{MatchedPolicy, PolicyId, PolicyKind, Severity};
pub use resolution::{resolve_conflict, ResolutionStrategy};
pub use validation::validate_policies;
