//! Conflict analysis orchestrator.
//!
//! `ConflictEngine` runs the detectors in a fixed order over one matched
//! policy list and attaches the merged outputs of every cumulative facet.
//! Detection is synchronous and side-effect free; the engine can be shared
//! across threads.

use regex::Regex;
use tracing::debug;

use crate::config::EngineConfig;
use crate::conflict::ConflictAnalysis;
use crate::detect::{detect_condition_overlaps, detect_type_overlaps, ContradictionDetector, PolicyPartition};
use crate::error::{ConfigError, EngineResult};
use crate::facet::FacetTable;
use crate::merge::merge_outputs;
use crate::policy::MatchedPolicy;
use crate::validation::validate_policies_with;

/// Detects and explains conflicts among matched policies.
#[derive(Debug)]
pub struct ConflictEngine {
    config: EngineConfig,
    key_pattern: Regex,
    contradictions: ContradictionDetector,
}

impl ConflictEngine {
    /// Creates an engine from a validated configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let key_pattern = config.permit_key_regex()?;
        Ok(Self {
            config,
            key_pattern,
            contradictions: ContradictionDetector::default(),
        })
    }

    /// Replaces the contradiction checks.
    #[must_use]
    pub fn with_contradiction_detector(mut self, detector: ContradictionDetector) -> Self {
        self.contradictions = detector;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyzes `policies` without validating them.
    ///
    /// Fewer than two policies never conflict, but their cumulative outputs
    /// are still merged.
    #[must_use]
    pub fn detect_conflicts(&self, policies: &[MatchedPolicy]) -> ConflictAnalysis {
        run_detectors(policies, &self.config.facets, &self.contradictions)
    }

    /// Validates `policies` and then analyzes them.
    ///
    /// # Errors
    /// Returns `EngineError::Validation` describing the first malformed input.
    pub fn analyze(&self, policies: &[MatchedPolicy]) -> EngineResult<ConflictAnalysis> {
        validate_policies_with(policies, self.config.max_policies, &self.key_pattern)?;
        Ok(self.detect_conflicts(policies))
    }
}

/// Group order is type overlaps, then condition overlaps, then
/// contradictions.
fn run_detectors(
    policies: &[MatchedPolicy],
    facets: &FacetTable,
    contradictions: &ContradictionDetector,
) -> ConflictAnalysis {
    let resolved = merge_outputs(policies, facets);

    if policies.len() < 2 {
        debug!(policies = policies.len(), "nothing to compare");
        return ConflictAnalysis::new(Vec::new(), resolved);
    }

    let partition = PolicyPartition::classify(policies, facets);

    let mut groups = detect_type_overlaps(&partition, facets);
    let type_overlaps = groups.len();

    groups.extend(detect_condition_overlaps(policies));
    let condition_overlaps = groups.len() - type_overlaps;

    groups.extend(contradictions.detect(&partition, facets));
    let contradiction_groups = groups.len() - type_overlaps - condition_overlaps;

    debug!(
        policies = policies.len(),
        type_overlaps,
        condition_overlaps,
        contradictions = contradiction_groups,
        resolved = resolved.len(),
        "conflict analysis complete"
    );

    ConflictAnalysis::new(groups, resolved)
}

/// Analyzes `policies` with the reference facet table and default checks.
#[must_use]
pub fn detect_conflicts(policies: &[MatchedPolicy]) -> ConflictAnalysis {
    run_detectors(policies, &FacetTable::reference(), &ContradictionDetector::default())
}
