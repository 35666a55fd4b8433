use serde::{Deserialize, Serialize};

use crate::policy::PolicyId;

/// Strategy used to resolve a conflict group.
///
/// Strategies are pure: the same group and strategy always select the same
/// policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ResolutionStrategy {
    /// Select the policy with the greatest `priority`.
    ///
    /// A missing priority ranks below every present one.
    Priority,

    /// Select the policy with the most conditions.
    Specificity,

    /// Select the policy a reviewer chose.
    Manual {
        /// ID of the chosen policy.
        winner_id: PolicyId,
    },

    /// Select nothing; the facet merge engine combines the outputs.
    Merge,
}

impl ResolutionStrategy {
    /// Creates a manual strategy for `winner_id`.
    #[must_use]
    pub fn manual(winner_id: impl Into<PolicyId>) -> Self {
        Self::Manual {
            winner_id: winner_id.into(),
        }
    }

    /// Returns a short stable identifier suitable for logging/debugging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Priority => "priority",
            Self::Specificity => "specificity",
            Self::Manual { .. } => "manual",
            Self::Merge => "merge",
        }
    }

    /// Returns true if the strategy can select a winner.
    #[must_use]
    pub const fn selects_winner(&self) -> bool {
        !matches!(self, Self::Merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_stable() {
        assert_eq!(ResolutionStrategy::Priority.name(), "priority");
        assert_eq!(ResolutionStrategy::Specificity.name(), "specificity");
        assert_eq!(ResolutionStrategy::manual("p").name(), "manual");
        assert_eq!(ResolutionStrategy::Merge.name(), "merge");
    }

    #[test]
    fn serialization_is_tagged() {
        let json = serde_json::to_value(ResolutionStrategy::manual("p-1")).unwrap();
        assert_eq!(json["type"], "manual");
        assert_eq!(json["winner_id"], "p-1");

        let s: ResolutionStrategy = serde_json::from_str(r#"{"type":"specificity"}"#).unwrap();
        assert_eq!(s, ResolutionStrategy::Specificity);
    }

    #[test]
    fn merge_never_selects() {
        assert!(!ResolutionStrategy::Merge.selects_winner());
        assert!(ResolutionStrategy::Priority.selects_winner());
    }
}
