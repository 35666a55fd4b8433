use tracing::trace;

use crate::conflict::{distinct_ids, ConflictGroup, ConflictKind};
use crate::detect::PolicyPartition;
use crate::facet::FacetTable;
use crate::policy::PolicyKind;

/// Emits one `type_overlap` group per exclusive kind with two or more
/// matched policies. Cumulative kinds never produce a group.
#[must_use]
pub fn detect_type_overlaps(partition: &PolicyPartition<'_>, facets: &FacetTable) -> Vec<ConflictGroup> {
    let mut groups = Vec::new();

    for (kind, members) in partition.exclusive() {
        let distinct = distinct_ids(members.iter().copied());
        if distinct < 2 {
            continue;
        }

        let label = facets.label(kind);
        let names: Vec<&str> = members.iter().map(|p| p.name.as_str()).collect();
        let group = ConflictGroup::new(
            ConflictKind::TypeOverlap,
            members.iter().map(|p| (*p).clone()).collect(),
            facets.conflict_severity(kind),
            format!("{distinct} {label} policies apply to this load"),
        )
        .with_detail(format!(
            "{label} requirements do not combine automatically; only one can govern the move. Matched: {}.",
            names.join(", ")
        ))
        .with_suggestion(suggestion(kind));

        trace!(kind = %kind, policies = members.len(), "type overlap");
        groups.push(group);
    }

    groups
}

fn suggestion(kind: PolicyKind) -> &'static str {
    match kind {
        PolicyKind::Route => "Review the route restrictions manually before dispatch.",
        PolicyKind::Permit => "Select one permit type by priority, or confirm the permit manually.",
        _ => "Resolve by priority or specificity, or confirm the governing policy manually.",
    }
}
