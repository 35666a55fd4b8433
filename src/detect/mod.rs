//! Conflict detectors.
//!
//! Each detector is a pure function of the matched-policy list (and the
//! facet table). The orchestrator in `engine` runs them in a fixed order:
//! type overlaps, condition overlaps, output contradictions.

mod classify;
mod condition_overlap;
mod contradiction;
mod type_overlap;

pub use classify::PolicyPartition;
pub use condition_overlap::{detect_condition_overlaps, overlapping_attributes};
pub use contradiction::{
    ContradictionCheck, ContradictionDetector, ContradictionFinding, PermitTypeCheck,
    RouteDirectionCheck,
};
pub use type_overlap::detect_type_overlaps;
