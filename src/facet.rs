//! Facet configuration.
//!
//! Each policy kind maps to a merge strategy and the severity its overlaps
//! are reported with. A facet is cumulative when its strategy is anything
//! but `none`; cumulative facets are merged instead of flagged. Detectors
//! only ever consult this table, so making a facet cumulative is a data
//! change.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::{PolicyKind, Severity};

/// How concurrently matched outputs of one facet combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Take the maximum of every count.
    Max,
    /// Take the deduplicated union of every set.
    Union,
    /// Take the tightest value of every limit.
    MostRestrictive,
    /// Never combine; co-occurrence is a conflict.
    #[default]
    #[serde(rename = "none")]
    NoMerge,
}

impl MergeStrategy {
    /// Returns a short stable identifier.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Union => "union",
            Self::MostRestrictive => "most_restrictive",
            Self::NoMerge => "none",
        }
    }

    /// Returns true for every strategy except `none`.
    #[must_use]
    pub const fn is_cumulative(&self) -> bool {
        !matches!(self, Self::NoMerge)
    }

    /// Returns true if `kind` has a merge function for this strategy.
    #[must_use]
    pub const fn supported_by(&self, kind: PolicyKind) -> bool {
        match self {
            Self::NoMerge => true,
            Self::Max => matches!(kind, PolicyKind::Escort),
            Self::Union => matches!(kind, PolicyKind::Utility),
            Self::MostRestrictive => matches!(
                kind,
                PolicyKind::Speed | PolicyKind::Hours | PolicyKind::Route | PolicyKind::Dimension
            ),
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration of a single facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetConfig {
    /// Label used in conflict descriptions; empty falls back to the kind's label.
    #[serde(default)]
    pub label: String,

    /// How outputs of this facet combine.
    #[serde(default)]
    pub merge_strategy: MergeStrategy,

    /// Severity of type overlaps on this facet.
    #[serde(default)]
    pub conflict_severity: Severity,
}

impl FacetConfig {
    /// An exclusive facet reported at `severity`.
    #[must_use]
    pub fn exclusive(severity: Severity) -> Self {
        Self {
            label: String::new(),
            merge_strategy: MergeStrategy::NoMerge,
            conflict_severity: severity,
        }
    }

    /// A cumulative facet merged with `strategy`.
    #[must_use]
    pub fn cumulative(strategy: MergeStrategy) -> Self {
        Self {
            label: String::new(),
            merge_strategy: strategy,
            conflict_severity: Severity::Info,
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns true if outputs of this facet auto-merge.
    #[must_use]
    pub const fn is_cumulative(&self) -> bool {
        self.merge_strategy.is_cumulative()
    }
}

impl Default for FacetConfig {
    fn default() -> Self {
        Self::exclusive(Severity::Info)
    }
}

/// Per-kind facet configuration.
///
/// Kinds missing from the table are exclusive with `info` severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FacetTable(BTreeMap<PolicyKind, FacetConfig>);

impl FacetTable {
    /// A table with no entries; every kind is exclusive/info.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// The reference table: escort and utility merge, route overlaps are
    /// critical, permit overlaps are warnings.
    #[must_use]
    pub fn reference() -> Self {
        Self::empty()
            .with_facet(PolicyKind::Escort, FacetConfig::cumulative(MergeStrategy::Max))
            .with_facet(PolicyKind::Utility, FacetConfig::cumulative(MergeStrategy::Union))
            .with_facet(PolicyKind::Permit, FacetConfig::exclusive(Severity::Warning))
            .with_facet(PolicyKind::Route, FacetConfig::exclusive(Severity::Critical))
            .with_facet(PolicyKind::Speed, FacetConfig::exclusive(Severity::Info))
            .with_facet(PolicyKind::Hours, FacetConfig::exclusive(Severity::Info))
            .with_facet(PolicyKind::Dimension, FacetConfig::exclusive(Severity::Info))
    }

    /// Sets the configuration for `kind`.
    #[must_use]
    pub fn with_facet(mut self, kind: PolicyKind, config: FacetConfig) -> Self {
        self.0.insert(kind, config);
        self
    }

    /// Returns the configuration for `kind`.
    #[must_use]
    pub fn get(&self, kind: PolicyKind) -> FacetConfig {
        self.0.get(&kind).cloned().unwrap_or_default()
    }

    /// Returns the merge strategy for `kind`.
    #[must_use]
    pub fn merge_strategy(&self, kind: PolicyKind) -> MergeStrategy {
        self.0
            .get(&kind)
            .map_or(MergeStrategy::NoMerge, |c| c.merge_strategy)
    }

    /// Returns true if `kind` auto-merges.
    #[must_use]
    pub fn is_cumulative(&self, kind: PolicyKind) -> bool {
        self.merge_strategy(kind).is_cumulative()
    }

    /// Returns the severity overlaps of `kind` are reported with.
    #[must_use]
    pub fn conflict_severity(&self, kind: PolicyKind) -> Severity {
        self.0
            .get(&kind)
            .map_or(Severity::Info, |c| c.conflict_severity)
    }

    /// Returns the display label for `kind`.
    #[must_use]
    pub fn label(&self, kind: PolicyKind) -> String {
        match self.0.get(&kind) {
            Some(c) if !c.label.trim().is_empty() => c.label.clone(),
            _ => kind.label().to_string(),
        }
    }

    /// Returns the cumulative kinds, in kind order.
    #[must_use]
    pub fn cumulative_kinds(&self) -> Vec<PolicyKind> {
        PolicyKind::ALL
            .into_iter()
            .filter(|k| self.is_cumulative(*k))
            .collect()
    }

    /// Rejects strategies a facet has no merge function for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, config) in &self.0 {
            if !config.merge_strategy.supported_by(*kind) {
                return Err(ConfigError::UnsupportedMergeStrategy {
                    kind: *kind,
                    strategy: config.merge_strategy.name().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for FacetTable {
    fn default() -> Self {
        Self::reference()
    }
}

/// A facet entry as written in configuration; absent fields keep the
/// reference value.
#[derive(Debug, Deserialize)]
struct FacetConfigPatch {
    label: Option<String>,
    merge_strategy: Option<MergeStrategy>,
    conflict_severity: Option<Severity>,
}

impl FacetConfigPatch {
    fn apply(self, mut config: FacetConfig) -> FacetConfig {
        if let Some(label) = self.label {
            config.label = label;
        }
        if let Some(strategy) = self.merge_strategy {
            config.merge_strategy = strategy;
        }
        if let Some(severity) = self.conflict_severity {
            config.conflict_severity = severity;
        }
        config
    }
}

impl<'de> Deserialize<'de> for FacetTable {
    /// Entries overlay the reference table field by field.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let patches = BTreeMap::<PolicyKind, FacetConfigPatch>::deserialize(deserializer)?;
        let mut table = Self::reference();
        for (kind, patch) in patches {
            let config = patch.apply(table.get(kind));
            table.0.insert(kind, config);
        }
        Ok(table)
    }
}
