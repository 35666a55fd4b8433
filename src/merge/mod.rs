//! Facet merge engine.
//!
//! Combines every output of a cumulative facet into one effective
//! requirement. Runs over the full input regardless of detected conflicts.
//! Outputs are bucketed by their variant, not by the owning policy's kind.
//! A facet is merged only when its configured strategy has a merge function
//! for it; anything else is left unmerged.

mod escort;
mod restrictive;
mod utility;

use std::collections::BTreeMap;

use tracing::warn;

use crate::facet::{FacetTable, MergeStrategy};
use crate::output::PolicyOutput;
use crate::policy::{MatchedPolicy, PolicyKind};

pub use escort::merge_escort_requirements;
pub use restrictive::{
    merge_dimension_requirements, merge_hours_requirements, merge_route_requirements,
    merge_speed_requirements,
};
pub use utility::merge_utility_notice_requirements;

/// Separator between concatenated notes.
pub const NOTES_SEPARATOR: &str = "; ";

/// Concatenates every non-blank note, in order, as written.
pub(crate) fn concat_notes<'a, I>(notes: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let parts: Vec<&str> = notes
        .into_iter()
        .flatten()
        .filter(|n| !n.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(NOTES_SEPARATOR))
    }
}

/// Appends `value` unless already present.
pub(crate) fn push_unique(target: &mut Vec<String>, value: &str) {
    if !target.iter().any(|v| v == value) {
        target.push(value.to_string());
    }
}

/// Merges one facet's outputs with `strategy`.
///
/// Returns `None` when the facet has no merge function for the strategy.
#[must_use]
pub fn merge_facet(kind: PolicyKind, strategy: MergeStrategy, outputs: &[&PolicyOutput]) -> Option<PolicyOutput> {
    let merged = match (kind, strategy) {
        (PolicyKind::Escort, MergeStrategy::Max) => PolicyOutput::Escort(merge_escort_requirements(
            outputs.iter().filter_map(|o| o.as_escort()),
        )),
        (PolicyKind::Utility, MergeStrategy::Union) => PolicyOutput::Utility(
            merge_utility_notice_requirements(outputs.iter().filter_map(|o| o.as_utility())),
        ),
        (PolicyKind::Speed, MergeStrategy::MostRestrictive) => PolicyOutput::Speed(
            merge_speed_requirements(outputs.iter().filter_map(|o| o.as_speed())),
        ),
        (PolicyKind::Hours, MergeStrategy::MostRestrictive) => PolicyOutput::Hours(
            merge_hours_requirements(outputs.iter().filter_map(|o| o.as_hours())),
        ),
        (PolicyKind::Route, MergeStrategy::MostRestrictive) => PolicyOutput::Route(
            merge_route_requirements(outputs.iter().filter_map(|o| o.as_route())),
        ),
        (PolicyKind::Dimension, MergeStrategy::MostRestrictive) => PolicyOutput::Dimension(
            merge_dimension_requirements(outputs.iter().filter_map(|o| o.as_dimension())),
        ),
        _ => return None,
    };
    Some(merged)
}

/// Produces one merged output per cumulative facet present in `policies`.
///
/// A facet appears in the result iff at least one policy carries an output
/// of that shape and the facet is cumulative with a supported strategy.
#[must_use]
pub fn merge_outputs(policies: &[MatchedPolicy], facets: &FacetTable) -> BTreeMap<PolicyKind, PolicyOutput> {
    let mut buckets: BTreeMap<PolicyKind, Vec<&PolicyOutput>> = BTreeMap::new();
    for output in policies.iter().filter_map(|p| p.output.as_ref()) {
        buckets.entry(output.facet()).or_default().push(output);
    }

    let mut resolved = BTreeMap::new();
    for (kind, outputs) in buckets {
        let strategy = facets.merge_strategy(kind);
        if !strategy.is_cumulative() {
            continue;
        }
        match merge_facet(kind, strategy, &outputs) {
            Some(merged) => {
                resolved.insert(kind, merged);
            }
            None => warn!(
                kind = %kind,
                strategy = %strategy,
                "facet has no merge function for configured strategy; left unmerged"
            ),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::FacetConfig;
    use crate::output::{EscortRequirement, PermitRequirement, SpeedRequirement, UtilityNoticeRequirement};

    #[test]
    fn concat_skips_empty_notes() {
        let merged = concat_notes([Some("Note 1"), None, Some("  "), Some("Note 2")]);
        assert_eq!(merged.as_deref(), Some("Note 1; Note 2"));
        assert_eq!(concat_notes([None, Some("")]), None);
    }

    #[test]
    fn concat_keeps_note_text_verbatim() {
        let merged = concat_notes([Some(" Note 1 "), Some("\t"), Some("Note 2\n")]);
        assert_eq!(merged.as_deref(), Some(" Note 1 ; Note 2\n"));
    }

    #[test]
    fn resolved_outputs_only_for_present_cumulative_facets() {
        let policies = vec![
            MatchedPolicy::new("e", "Escort", PolicyKind::Escort).with_output(EscortRequirement::new(1, 0)),
            MatchedPolicy::new("p", "Permit", PolicyKind::Permit)
                .with_output(PermitRequirement::new("single_trip", "Single trip")),
        ];
        let resolved = merge_outputs(&policies, &FacetTable::reference());
        assert_eq!(resolved.keys().copied().collect::<Vec<_>>(), vec![PolicyKind::Escort]);
    }

    #[test]
    fn policies_without_outputs_produce_nothing() {
        let policies = vec![MatchedPolicy::new("e", "Escort", PolicyKind::Escort)];
        assert!(merge_outputs(&policies, &FacetTable::reference()).is_empty());
    }

    #[test]
    fn bucketing_follows_output_shape() {
        // Declared as a permit, but carries an escort output.
        let policies = vec![
            MatchedPolicy::new("a", "Mislabelled", PolicyKind::Permit).with_output(EscortRequirement::new(2, 0)),
            MatchedPolicy::new("b", "Escort", PolicyKind::Escort).with_output(EscortRequirement::new(0, 1)),
        ];
        let resolved = merge_outputs(&policies, &FacetTable::reference());
        let escort = resolved[&PolicyKind::Escort].as_escort().unwrap();
        assert_eq!((escort.front_escorts, escort.rear_escorts), (2, 1));
        assert!(!resolved.contains_key(&PolicyKind::Permit));
    }

    #[test]
    fn unsupported_strategy_is_left_unmerged() {
        let facets = FacetTable::reference()
            .with_facet(PolicyKind::Utility, FacetConfig::cumulative(MergeStrategy::Max));
        let policies = vec![MatchedPolicy::new("u", "Utility", PolicyKind::Utility)
            .with_output(UtilityNoticeRequirement::new(24, ["wire"]))];
        assert!(merge_outputs(&policies, &facets).is_empty());
    }

    #[test]
    fn restrictive_facet_merges_when_configured() {
        let facets = FacetTable::reference().with_facet(
            PolicyKind::Speed,
            FacetConfig::cumulative(MergeStrategy::MostRestrictive),
        );
        let speed = |mph| SpeedRequirement {
            max_speed_mph: Some(mph),
            ..SpeedRequirement::default()
        };
        let policies = vec![
            MatchedPolicy::new("s1", "Speed 1", PolicyKind::Speed).with_output(speed(55.0)),
            MatchedPolicy::new("s2", "Speed 2", PolicyKind::Speed).with_output(speed(45.0)),
        ];
        let resolved = merge_outputs(&policies, &facets);
        assert_eq!(resolved[&PolicyKind::Speed].as_speed().unwrap().max_speed_mph, Some(45.0));

        assert!(merge_outputs(&policies, &FacetTable::reference()).is_empty());
    }

    #[test]
    fn merge_facet_refuses_permit() {
        let permit = PolicyOutput::from(PermitRequirement::new("superload", "Superload"));
        assert!(merge_facet(PolicyKind::Permit, MergeStrategy::Max, &[&permit]).is_none());
        assert!(merge_facet(PolicyKind::Permit, MergeStrategy::NoMerge, &[&permit]).is_none());
    }
}
