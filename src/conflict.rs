//! Conflict groups and the analysis result.
//!
//! Conflicts are explicit values, not errors. A `ConflictGroup` names two or
//! more matched policies whose co-occurrence needs a resolution strategy or
//! human review. `ConflictAnalysis` is the serialized contract handed to
//! presentation layers, so its field names are camelCase.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::condition::Attribute;
use crate::output::PolicyOutput;
use crate::policy::{MatchedPolicy, PolicyId, PolicyKind, Severity};

/// Identifier of a conflict group.
///
/// Unique within one analysis; carries no meaning beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictGroupId(Uuid);

impl ConflictGroupId {
    /// Creates a new random group ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConflictGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConflictGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The type of conflict a group represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Several policies of one exclusive facet matched.
    TypeOverlap,
    /// Two policies trigger on intersecting attribute ranges.
    ConditionOverlap,
    /// Policies of one facet demand irreconcilable outputs.
    RequirementContradiction,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeOverlap => write!(f, "type_overlap"),
            Self::ConditionOverlap => write!(f, "condition_overlap"),
            Self::RequirementContradiction => write!(f, "requirement_contradiction"),
        }
    }
}

/// One side of a contradiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContradictionValue {
    /// The value this policy demands.
    pub value: String,
    /// Policy demanding it.
    pub policy_id: PolicyId,
    /// Display name of that policy.
    pub policy_title: String,
}

impl ContradictionValue {
    /// Creates a value attributed to `policy`.
    #[must_use]
    pub fn from_policy(value: impl Into<String>, policy: &MatchedPolicy) -> Self {
        Self {
            value: value.into(),
            policy_id: policy.id.clone(),
            policy_title: policy.name.clone(),
        }
    }
}

/// A field on which policies disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    /// Output field in disagreement.
    pub field: String,
    /// One entry per distinct demanded value.
    pub values: Vec<ContradictionValue>,
}

/// A detected set of two or more policies that need resolution or review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictGroup {
    /// Group identifier.
    pub id: ConflictGroupId,

    /// Conflict type.
    #[serde(rename = "type")]
    pub kind: ConflictKind,

    /// Involved policies, in input order.
    pub policies: Vec<MatchedPolicy>,

    /// Highest concern the group warrants.
    pub severity: Severity,

    /// One-line summary.
    pub description: String,

    /// Longer explanation.
    pub detail: String,

    /// Attributes on which the policies' triggers intersect (condition overlaps only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlapping_attributes: Option<Vec<Attribute>>,

    /// Disagreeing fields (contradictions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contradictions: Option<Vec<Contradiction>>,

    /// Suggested way to resolve the group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_resolution: Option<String>,
}

impl ConflictGroup {
    /// Creates a group with a fresh ID.
    #[must_use]
    pub fn new(
        kind: ConflictKind,
        policies: Vec<MatchedPolicy>,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: ConflictGroupId::new(),
            kind,
            policies,
            severity,
            description: description.into(),
            detail: String::new(),
            overlapping_attributes: None,
            contradictions: None,
            suggested_resolution: None,
        }
    }

    /// Sets the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Sets the overlapping attributes.
    #[must_use]
    pub fn with_overlapping_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.overlapping_attributes = Some(attributes);
        self
    }

    /// Sets the contradictions.
    #[must_use]
    pub fn with_contradictions(mut self, contradictions: Vec<Contradiction>) -> Self {
        self.contradictions = Some(contradictions);
        self
    }

    /// Sets the suggested resolution.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggested_resolution = Some(suggestion.into());
        self
    }

    /// Returns the IDs of the involved policies, in group order.
    #[must_use]
    pub fn policy_ids(&self) -> Vec<&PolicyId> {
        self.policies.iter().map(|p| &p.id).collect()
    }

    /// Returns true if `id` is one of the involved policies.
    #[must_use]
    pub fn contains_policy(&self, id: &PolicyId) -> bool {
        self.policies.iter().any(|p| &p.id == id)
    }

    /// Returns the number of involved policies.
    #[must_use]
    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }
}

/// Groups compare by content; the random `id` is ignored.
impl PartialEq for ConflictGroup {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.severity == other.severity
            && self.policies == other.policies
            && self.description == other.description
            && self.detail == other.detail
            && self.overlapping_attributes == other.overlapping_attributes
            && self.contradictions == other.contradictions
            && self.suggested_resolution == other.suggested_resolution
    }
}

/// Number of groups of each conflict kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCounts {
    /// Type overlap groups.
    pub type_overlap: usize,
    /// Condition overlap groups.
    pub condition_overlap: usize,
    /// Requirement contradiction groups.
    pub requirement_contradiction: usize,
}

impl ConflictCounts {
    /// Tallies `groups` by kind.
    #[must_use]
    pub fn tally(groups: &[ConflictGroup]) -> Self {
        let mut counts = Self::default();
        for group in groups {
            match group.kind {
                ConflictKind::TypeOverlap => counts.type_overlap += 1,
                ConflictKind::ConditionOverlap => counts.condition_overlap += 1,
                ConflictKind::RequirementContradiction => counts.requirement_contradiction += 1,
            }
        }
        counts
    }

    /// Total number of groups.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.type_overlap + self.condition_overlap + self.requirement_contradiction
    }
}

/// Result of analysing one matched-policy list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictAnalysis {
    /// True iff at least one group was found.
    pub has_conflicts: bool,

    /// Detected groups: type overlaps, then condition overlaps, then contradictions.
    pub groups: Vec<ConflictGroup>,

    /// Distinct policy IDs across all groups.
    pub total_conflicting_policies: usize,

    /// Groups per conflict type.
    pub counts: ConflictCounts,

    /// One merged output per cumulative facet present in the input,
    /// computed whether or not conflicts exist.
    pub resolved_outputs: BTreeMap<PolicyKind, PolicyOutput>,
}

impl ConflictAnalysis {
    /// Builds an analysis from detected groups and merged outputs.
    #[must_use]
    pub fn new(groups: Vec<ConflictGroup>, resolved_outputs: BTreeMap<PolicyKind, PolicyOutput>) -> Self {
        let total_conflicting_policies = groups
            .iter()
            .flat_map(|g| g.policies.iter().map(|p| &p.id))
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            has_conflicts: !groups.is_empty(),
            counts: ConflictCounts::tally(&groups),
            total_conflicting_policies,
            groups,
            resolved_outputs,
        }
    }

    /// Returns the groups of one kind.
    pub fn groups_of(&self, kind: ConflictKind) -> impl Iterator<Item = &ConflictGroup> {
        self.groups.iter().filter(move |g| g.kind == kind)
    }

    /// Returns the merged output for a cumulative facet.
    #[must_use]
    pub fn resolved(&self, kind: PolicyKind) -> Option<&PolicyOutput> {
        self.resolved_outputs.get(&kind)
    }

    /// Returns the distinct conflicting policy IDs, sorted.
    #[must_use]
    pub fn conflicting_policy_ids(&self) -> BTreeSet<&PolicyId> {
        self.groups
            .iter()
            .flat_map(|g| g.policies.iter().map(|p| &p.id))
            .collect()
    }
}

/// Returns the number of distinct policy IDs in `policies`.
pub(crate) fn distinct_ids<'a, I>(policies: I) -> usize
where
    I: IntoIterator<Item = &'a MatchedPolicy>,
{
    policies
        .into_iter()
        .map(|p| &p.id)
        .collect::<BTreeSet<_>>()
        .len()
}
