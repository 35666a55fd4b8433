use std::fmt;

use tracing::trace;

use crate::conflict::{distinct_ids, ConflictGroup, ConflictKind, Contradiction, ContradictionValue};
use crate::detect::PolicyPartition;
use crate::facet::FacetTable;
use crate::policy::{MatchedPolicy, PolicyKind, Severity};

/// Policies found to contradict each other on one or more fields.
#[derive(Debug, Clone)]
pub struct ContradictionFinding<'a> {
    /// Involved policies, in input order.
    pub policies: Vec<&'a MatchedPolicy>,
    /// Disagreeing fields.
    pub contradictions: Vec<Contradiction>,
    /// One-line summary.
    pub description: String,
}

/// A kind-specific check for irreconcilable output values.
///
/// Checks only see policies of their own kind and are never run for
/// cumulative facets.
pub trait ContradictionCheck: Send + Sync + fmt::Debug {
    /// Facet this check inspects.
    fn kind(&self) -> PolicyKind;

    /// Inspects the matched policies of `kind()`.
    fn check<'a>(&self, policies: &[&'a MatchedPolicy]) -> Option<ContradictionFinding<'a>>;
}

/// Flags permit policies that demand different permit types.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitTypeCheck;

impl ContradictionCheck for PermitTypeCheck {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Permit
    }

    fn check<'a>(&self, policies: &[&'a MatchedPolicy]) -> Option<ContradictionFinding<'a>> {
        let permits: Vec<_> = policies
            .iter()
            .filter_map(|p| p.output.as_ref()?.as_permit().map(|o| (*p, o)))
            .collect();
        if permits.len() < 2 {
            return None;
        }

        // First policy seen with each key represents it.
        let mut keys: Vec<(&str, &MatchedPolicy)> = Vec::new();
        for (policy, permit) in &permits {
            if !keys.iter().any(|(k, _)| *k == permit.permit_type_key) {
                keys.push((permit.permit_type_key.as_str(), *policy));
            }
        }
        if keys.len() < 2 {
            return None;
        }

        let listed = keys.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(", ");
        Some(ContradictionFinding {
            policies: permits.iter().map(|(p, _)| *p).collect(),
            contradictions: vec![Contradiction {
                field: "permit_type".to_string(),
                values: keys
                    .iter()
                    .map(|(k, p)| ContradictionValue::from_policy(*k, p))
                    .collect(),
            }],
            description: format!("Matched permit policies require different permit types: {listed}"),
        })
    }
}

/// Flags route policies where one requires a route another restricts.
#[derive(Debug, Default, Clone, Copy)]
pub struct RouteDirectionCheck;

fn normalize_route(route: &str) -> String {
    route.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

impl ContradictionCheck for RouteDirectionCheck {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Route
    }

    fn check<'a>(&self, policies: &[&'a MatchedPolicy]) -> Option<ContradictionFinding<'a>> {
        let routes: Vec<_> = policies
            .iter()
            .filter_map(|p| p.output.as_ref()?.as_route().map(|o| (*p, o)))
            .collect();
        if routes.len() < 2 {
            return None;
        }

        // Keyed by normalized route name.
        let mut found: Vec<(String, Contradiction)> = Vec::new();
        let mut involved: Vec<usize> = Vec::new();

        for (i, (requiring, req)) in routes.iter().enumerate() {
            for required in &req.required_routes {
                let wanted = normalize_route(required);
                for (j, (restricting, res)) in routes.iter().enumerate() {
                    if i == j || requiring.id == restricting.id {
                        continue;
                    }
                    let Some(blocked) = res
                        .restricted_routes
                        .iter()
                        .find(|r| normalize_route(r) == wanted)
                    else {
                        continue;
                    };

                    let existing = found.iter().position(|(r, _)| *r == wanted);
                    let pos = match existing {
                        Some(pos) => pos,
                        None => {
                            found.push((
                                wanted.clone(),
                                Contradiction {
                                    field: "route".to_string(),
                                    values: Vec::new(),
                                },
                            ));
                            found.len() - 1
                        }
                    };

                    let entry = &mut found[pos].1;
                    for value in [
                        ContradictionValue::from_policy(format!("required: {required}"), requiring),
                        ContradictionValue::from_policy(format!("restricted: {blocked}"), restricting),
                    ] {
                        if !entry.values.contains(&value) {
                            entry.values.push(value);
                        }
                    }

                    for idx in [i, j] {
                        if !involved.contains(&idx) {
                            involved.push(idx);
                        }
                    }
                }
            }
        }

        if found.is_empty() {
            return None;
        }

        involved.sort_unstable();
        let listed = found
            .iter()
            .map(|(route, _)| route.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Some(ContradictionFinding {
            policies: involved.into_iter().map(|i| routes[i].0).collect(),
            contradictions: found.into_iter().map(|(_, c)| c).collect(),
            description: format!("Route policies both require and restrict: {listed}"),
        })
    }
}

/// Runs the registered contradiction checks over exclusive facets.
#[derive(Debug)]
pub struct ContradictionDetector {
    checks: Vec<Box<dyn ContradictionCheck>>,
}

impl Default for ContradictionDetector {
    fn default() -> Self {
        Self::empty()
            .with_check(PermitTypeCheck)
            .with_check(RouteDirectionCheck)
    }
}

impl ContradictionDetector {
    /// A detector with no checks.
    #[must_use]
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// Registers a check.
    #[must_use]
    pub fn with_check(mut self, check: impl ContradictionCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Returns the kinds with a registered check.
    #[must_use]
    pub fn kinds(&self) -> Vec<PolicyKind> {
        self.checks.iter().map(|c| c.kind()).collect()
    }

    /// Emits one `requirement_contradiction` group per failing check.
    ///
    /// Group severity is the facet's conflict severity, floored at warning.
    #[must_use]
    pub fn detect(&self, partition: &PolicyPartition<'_>, facets: &FacetTable) -> Vec<ConflictGroup> {
        let mut groups = Vec::new();

        for check in &self.checks {
            let kind = check.kind();
            if facets.is_cumulative(kind) {
                continue;
            }

            let members = partition.of_kind(kind);
            if members.len() < 2 {
                continue;
            }

            let Some(finding) = check.check(members) else {
                continue;
            };
            if distinct_ids(finding.policies.iter().copied()) < 2 {
                continue;
            }

            trace!(kind = %kind, policies = finding.policies.len(), "requirement contradiction");

            let fields = finding
                .contradictions
                .iter()
                .map(|c| c.field.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let severity = facets.conflict_severity(kind).max(Severity::Warning);

            groups.push(
                ConflictGroup::new(
                    ConflictKind::RequirementContradiction,
                    finding.policies.iter().map(|p| (*p).clone()).collect(),
                    severity,
                    finding.description,
                )
                .with_detail(format!(
                    "{} policies disagree on {fields}; the requirements cannot all be met.",
                    facets.label(kind)
                ))
                .with_suggestion("Pick the governing policy manually or by priority.")
                .with_contradictions(finding.contradictions),
            );
        }

        groups
    }
}
