use std::collections::BTreeMap;

use crate::facet::FacetTable;
use crate::policy::{MatchedPolicy, PolicyKind};

/// Matched policies partitioned by kind, split into cumulative and
/// exclusive facets.
///
/// Within each kind, policies keep their input order.
#[derive(Debug, Clone, Default)]
pub struct PolicyPartition<'a> {
    cumulative: BTreeMap<PolicyKind, Vec<&'a MatchedPolicy>>,
    exclusive: BTreeMap<PolicyKind, Vec<&'a MatchedPolicy>>,
}

impl<'a> PolicyPartition<'a> {
    /// Partitions `policies` by their declared kind.
    #[must_use]
    pub fn classify(policies: &'a [MatchedPolicy], facets: &FacetTable) -> Self {
        let mut partition = Self::default();
        for policy in policies {
            let bucket = if facets.is_cumulative(policy.kind) {
                &mut partition.cumulative
            } else {
                &mut partition.exclusive
            };
            bucket.entry(policy.kind).or_default().push(policy);
        }
        partition
    }

    /// Returns the policies of `kind`, in input order.
    #[must_use]
    pub fn of_kind(&self, kind: PolicyKind) -> &[&'a MatchedPolicy] {
        self.cumulative
            .get(&kind)
            .or_else(|| self.exclusive.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Cumulative kinds present in the input with their policies.
    pub fn cumulative(&self) -> impl Iterator<Item = (PolicyKind, &[&'a MatchedPolicy])> {
        self.cumulative.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Exclusive kinds present in the input with their policies.
    pub fn exclusive(&self) -> impl Iterator<Item = (PolicyKind, &[&'a MatchedPolicy])> {
        self.exclusive.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Returns true if `kind` was classified as cumulative.
    #[must_use]
    pub fn is_cumulative(&self, kind: PolicyKind) -> bool {
        self.cumulative.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(id: &str, kind: PolicyKind) -> MatchedPolicy {
        MatchedPolicy::new(id, id, kind)
    }

    #[test]
    fn splits_cumulative_and_exclusive() {
        let policies = vec![
            policy("e1", PolicyKind::Escort),
            policy("p1", PolicyKind::Permit),
            policy("u1", PolicyKind::Utility),
            policy("e2", PolicyKind::Escort),
        ];
        let partition = PolicyPartition::classify(&policies, &FacetTable::reference());

        let cumulative: Vec<_> = partition.cumulative().map(|(k, v)| (k, v.len())).collect();
        assert_eq!(
            cumulative,
            vec![(PolicyKind::Escort, 2), (PolicyKind::Utility, 1)]
        );

        let exclusive: Vec<_> = partition.exclusive().map(|(k, _)| k).collect();
        assert_eq!(exclusive, vec![PolicyKind::Permit]);
        assert!(partition.is_cumulative(PolicyKind::Escort));
        assert!(!partition.is_cumulative(PolicyKind::Permit));
    }

    #[test]
    fn preserves_input_order_within_kind() {
        let policies = vec![
            policy("r2", PolicyKind::Route),
            policy("s1", PolicyKind::Speed),
            policy("r1", PolicyKind::Route),
        ];
        let partition = PolicyPartition::classify(&policies, &FacetTable::reference());
        let ids: Vec<_> = partition
            .of_kind(PolicyKind::Route)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r2", "r1"]);
        assert!(partition.of_kind(PolicyKind::Hours).is_empty());
    }

    #[test]
    fn empty_table_makes_everything_exclusive() {
        let policies = vec![policy("e1", PolicyKind::Escort)];
        let partition = PolicyPartition::classify(&policies, &FacetTable::empty());
        assert_eq!(partition.cumulative().count(), 0);
        assert_eq!(partition.exclusive().count(), 1);
    }
}
