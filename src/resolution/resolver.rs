use crate::conflict::ConflictGroup;
use crate::policy::MatchedPolicy;
use crate::resolution::ResolutionStrategy;

/// Returns the first policy with the greatest key.
///
/// Only a strictly greater key replaces the current best, so exact ties
/// resolve to the earliest policy in group order.
fn first_max_by_key<K: Ord>(
    policies: &[MatchedPolicy],
    key: impl Fn(&MatchedPolicy) -> K,
) -> Option<&MatchedPolicy> {
    let (first, rest) = policies.split_first()?;
    let mut best = first;
    let mut best_key = key(first);
    for p in rest {
        let k = key(p);
        if k > best_key {
            best = p;
            best_key = k;
        }
    }
    Some(best)
}

/// Apply a resolution strategy to a conflict group.
///
/// Returns the winning policy, or `None` when the strategy declines to pick
/// one: `merge` always declines, `manual` declines when the ID is not in
/// the group, and every strategy declines on an empty group.
#[must_use]
pub fn resolve_conflict<'g>(
    group: &'g ConflictGroup,
    strategy: &ResolutionStrategy,
) -> Option<&'g MatchedPolicy> {
    match strategy {
        // `None < Some(_)`, so a missing priority ranks lowest.
        ResolutionStrategy::Priority => first_max_by_key(&group.policies, |p| p.priority),
        ResolutionStrategy::Specificity => {
            first_max_by_key(&group.policies, MatchedPolicy::condition_count)
        }
        ResolutionStrategy::Manual { winner_id } => {
            group.policies.iter().find(|p| &p.id == winner_id)
        }
        ResolutionStrategy::Merge => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Attribute, Condition};
    use crate::conflict::ConflictKind;
    use crate::policy::{PolicyKind, Severity};

    fn group(policies: Vec<MatchedPolicy>) -> ConflictGroup {
        ConflictGroup::new(ConflictKind::TypeOverlap, policies, Severity::Info, "test")
    }

    fn with_priority(id: &str, priority: Option<i32>) -> MatchedPolicy {
        let mut p = MatchedPolicy::new(id, id, PolicyKind::Speed);
        p.priority = priority;
        p
    }

    fn with_conditions(id: &str, n: usize) -> MatchedPolicy {
        let mut p = MatchedPolicy::new(id, id, PolicyKind::Speed);
        for i in 0..n {
            p = p.with_condition(Condition::gt(format!("c{i}"), Attribute::WidthFt, 10.0));
        }
        p
    }

    #[test]
    fn priority_picks_max() {
        let g = group(vec![
            with_priority("a", Some(10)),
            with_priority("b", Some(20)),
            with_priority("c", Some(5)),
        ]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::Priority).unwrap();
        assert_eq!(winner.id.as_str(), "b");
    }

    #[test]
    fn missing_priority_ranks_lowest() {
        let g = group(vec![with_priority("a", None), with_priority("b", Some(-5))]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::Priority).unwrap();
        assert_eq!(winner.id.as_str(), "b");
    }

    #[test]
    fn priority_tie_keeps_first() {
        let g = group(vec![
            with_priority("a", Some(7)),
            with_priority("b", Some(7)),
        ]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::Priority).unwrap();
        assert_eq!(winner.id.as_str(), "a");
    }

    #[test]
    fn specificity_picks_most_conditions() {
        let g = group(vec![with_conditions("a", 1), with_conditions("b", 2)]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::Specificity).unwrap();
        assert_eq!(winner.id.as_str(), "b");
    }

    #[test]
    fn specificity_tie_keeps_first() {
        let g = group(vec![with_conditions("a", 2), with_conditions("b", 2)]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::Specificity).unwrap();
        assert_eq!(winner.id.as_str(), "a");
    }

    #[test]
    fn manual_picks_exact_id() {
        let g = group(vec![with_priority("a", Some(99)), with_priority("b", None)]);
        let winner = resolve_conflict(&g, &ResolutionStrategy::manual("b")).unwrap();
        assert_eq!(winner.id.as_str(), "b");
        assert!(resolve_conflict(&g, &ResolutionStrategy::manual("zzz")).is_none());
    }

    #[test]
    fn merge_never_picks() {
        let g = group(vec![with_priority("a", Some(1)), with_priority("b", Some(2))]);
        assert!(resolve_conflict(&g, &ResolutionStrategy::Merge).is_none());
    }

    #[test]
    fn empty_group_resolves_to_none() {
        let g = group(Vec::new());
        assert!(resolve_conflict(&g, &ResolutionStrategy::Priority).is_none());
        assert!(resolve_conflict(&g, &ResolutionStrategy::Specificity).is_none());
    }
}
