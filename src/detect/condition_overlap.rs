use tracing::trace;

use crate::condition::Attribute;
use crate::conflict::{ConflictGroup, ConflictKind};
use crate::policy::{MatchedPolicy, Severity};

/// Returns the attributes on which `a` and `b` both have a condition and
/// the trigger domains of some pair of those conditions intersect.
///
/// Attributes are listed in the order they first appear in `a`.
#[must_use]
pub fn overlapping_attributes(a: &MatchedPolicy, b: &MatchedPolicy) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    for ca in &a.conditions {
        if attributes.contains(&ca.attribute) {
            continue;
        }
        if b.conditions.iter().any(|cb| ca.overlaps(cb)) {
            attributes.push(ca.attribute);
        }
    }
    attributes
}

/// Scans every unordered pair of policies once and emits one
/// `condition_overlap` group per pair that shares an overlapping attribute.
///
/// Pairs are visited in input order (`i < j`), so output order is stable.
#[must_use]
pub fn detect_condition_overlaps(policies: &[MatchedPolicy]) -> Vec<ConflictGroup> {
    let mut groups = Vec::new();

    for (i, a) in policies.iter().enumerate() {
        for b in &policies[i + 1..] {
            if a.id == b.id {
                continue;
            }

            let attributes = overlapping_attributes(a, b);
            if attributes.is_empty() {
                continue;
            }

            let list = attributes
                .iter()
                .map(Attribute::as_str)
                .collect::<Vec<_>>()
                .join(", ");

            trace!(a = %a.id, b = %b.id, attributes = %list, "condition overlap");

            groups.push(
                ConflictGroup::new(
                    ConflictKind::ConditionOverlap,
                    vec![a.clone(), b.clone()],
                    Severity::Info,
                    format!("{} and {} trigger on overlapping {list}", a.name, b.name),
                )
                .with_detail(format!(
                    "Both policies can match the same load on: {list}. Check that applying both is intended."
                ))
                .with_suggestion(
                    "If one policy refines the other, resolve by specificity.",
                )
                .with_overlapping_attributes(attributes),
            );
        }
    }

    groups
}
