//! Conflict resolution.
//!
//! Resolution picks one winning policy from a conflict group. Combining
//! outputs is never done here; the `merge` strategy defers to the facet
//! merge engine by returning no winner.

mod resolver;
mod strategy;

pub use resolver::resolve_conflict;
pub use strategy::ResolutionStrategy;
