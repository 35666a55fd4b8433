//! Matched policy types.
//!
//! A `MatchedPolicy` is a jurisdiction rule that the upstream matcher has
//! already evaluated against a load. The engine only reads these values; it
//! never mutates or persists them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::output::PolicyOutput;

/// Identifier of a matched policy, as assigned by the upstream matcher.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    /// Creates a policy ID from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PolicyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PolicyId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The functional category (facet) of a policy.
///
/// Declaration order is the order facets appear in analysis output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Pilot/escort vehicle requirements.
    Escort,
    /// Permit type requirements.
    Permit,
    /// Speed restrictions.
    Speed,
    /// Travel-hour restrictions.
    Hours,
    /// Route restrictions or mandates.
    Route,
    /// Advance notice to utility owners.
    Utility,
    /// Dimension or weight limits.
    Dimension,
}

impl PolicyKind {
    /// Every facet, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Escort,
        Self::Permit,
        Self::Speed,
        Self::Hours,
        Self::Route,
        Self::Utility,
        Self::Dimension,
    ];

    /// Returns the stable snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Escort => "escort",
            Self::Permit => "permit",
            Self::Speed => "speed",
            Self::Hours => "hours",
            Self::Route => "route",
            Self::Utility => "utility",
            Self::Dimension => "dimension",
        }
    }

    /// Returns a human-readable label used in conflict descriptions.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Escort => "Escort",
            Self::Permit => "Permit",
            Self::Speed => "Speed restriction",
            Self::Hours => "Travel hours",
            Self::Route => "Route",
            Self::Utility => "Utility notice",
            Self::Dimension => "Dimension limit",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity shared by policies and conflict groups.
///
/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; safe to review later.
    #[default]
    Info,
    /// Needs attention before dispatch.
    Warning,
    /// Blocks dispatch until reviewed.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// A policy that matched the load's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPolicy {
    /// Upstream identifier.
    pub id: PolicyId,

    /// Display name (used as the policy title in contradictions).
    pub name: String,

    /// Facet of the policy.
    pub kind: PolicyKind,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Policy severity as authored.
    #[serde(default)]
    pub severity: Severity,

    /// Trigger conditions, in authored order.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Optional priority; higher wins, absent ranks lowest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,

    /// Requirement this policy yields, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PolicyOutput>,
}

impl MatchedPolicy {
    /// Creates a policy with no conditions, priority or output.
    #[must_use]
    pub fn new(id: impl Into<PolicyId>, name: impl Into<String>, kind: PolicyKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            description: String::new(),
            severity: Severity::Info,
            conditions: Vec::new(),
            priority: None,
            output: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Appends a trigger condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the output.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PolicyOutput>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Returns the number of trigger conditions.
    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{Attribute, Condition};
    use crate::output::EscortRequirement;

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&PolicyKind::Utility).unwrap();
        assert_eq!(json, "\"utility\"");

        let kind: PolicyKind = serde_json::from_str("\"dimension\"").unwrap();
        assert_eq!(kind, PolicyKind::Dimension);
    }

    #[test]
    fn test_kind_display_matches_serde() {
        for kind in PolicyKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::default(), Severity::Info);
    }

    #[test]
    fn test_builder() {
        let policy = MatchedPolicy::new("p-1", "Wide load escort", PolicyKind::Escort)
            .with_priority(10)
            .with_condition(Condition::gt("c-1", Attribute::WidthFt, 12.0))
            .with_output(EscortRequirement::new(1, 0));

        assert_eq!(policy.id.as_str(), "p-1");
        assert_eq!(policy.priority, Some(10));
        assert_eq!(policy.condition_count(), 1);
        assert!(policy.output.is_some());
    }

    #[test]
    fn test_policy_deserialization_defaults() {
        let json = r#"{"id":"p-9","name":"Permit","kind":"permit"}"#;
        let policy: MatchedPolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.id, PolicyId::from("p-9"));
        assert!(policy.conditions.is_empty());
        assert!(policy.priority.is_none());
        assert!(policy.output.is_none());
        assert_eq!(policy.severity, Severity::Info);
    }
}
