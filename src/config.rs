//! Engine configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::facet::FacetTable;

/// Default pattern for `permit_type_key` (lower snake_case).
pub const DEFAULT_PERMIT_KEY_PATTERN: &str = "^[a-z][a-z0-9_]*$";

/// Default upper bound on matched policies accepted at the boundary.
pub const DEFAULT_MAX_POLICIES: usize = 500;

/// Configuration for a `ConflictEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Merge strategy and conflict severity per facet.
    pub facets: FacetTable,
    /// Pattern every `permit_type_key` must match during validation.
    pub permit_type_key_pattern: String,
    /// Maximum matched policies accepted by `ConflictEngine::analyze`.
    pub max_policies: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            facets: FacetTable::reference(),
            permit_type_key_pattern: DEFAULT_PERMIT_KEY_PATTERN.to_string(),
            max_policies: DEFAULT_MAX_POLICIES,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Sets the facet table.
    #[must_use]
    pub fn with_facets(mut self, facets: FacetTable) -> Self {
        self.facets = facets;
        self
    }

    /// Sets the policy limit.
    #[must_use]
    pub fn with_max_policies(mut self, max_policies: usize) -> Self {
        self.max_policies = max_policies;
        self
    }

    /// Compiles the permit key pattern.
    pub fn permit_key_regex(&self) -> Result<Regex, ConfigError> {
        Regex::new(&self.permit_type_key_pattern).map_err(|e| ConfigError::InvalidKeyPattern {
            pattern: self.permit_type_key_pattern.clone(),
            reason: e.to_string(),
        })
    }

    /// Validate the configuration.
    ///
    /// This must be called before constructing a `ConflictEngine`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_policies == 0 {
            return Err(ConfigError::ZeroPolicyLimit);
        }
        self.facets.validate()?;
        self.permit_key_regex()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::{FacetConfig, MergeStrategy};
    use crate::policy::{PolicyKind, Severity};

    #[test]
    fn config_default_is_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn config_rejects_zero_limit() {
        let c = EngineConfig::default().with_max_policies(0);
        assert!(matches!(c.validate(), Err(ConfigError::ZeroPolicyLimit)));
    }

    #[test]
    fn config_rejects_bad_pattern() {
        let mut c = EngineConfig::default();
        c.permit_type_key_pattern = "([a-z".to_string();
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidKeyPattern { .. })
        ));
    }

    #[test]
    fn config_rejects_unsupported_strategy() {
        let c = EngineConfig::default().with_facets(
            FacetTable::reference()
                .with_facet(PolicyKind::Utility, FacetConfig::cumulative(MergeStrategy::Max)),
        );
        assert!(c.validate().is_err());
    }

    #[test]
    fn config_from_partial_json() {
        let c = EngineConfig::from_json_str(r#"{"max_policies": 50}"#).unwrap();
        assert_eq!(c.max_policies, 50);
        assert_eq!(c.permit_type_key_pattern, DEFAULT_PERMIT_KEY_PATTERN);
        assert!(c.facets.is_cumulative(PolicyKind::Escort));
    }

    #[test]
    fn config_severity_override_keeps_strategy() {
        let c = EngineConfig::from_json_str(r#"{"facets": {"escort": {"conflict_severity": "warning"}}}"#)
            .unwrap();
        assert_eq!(c.facets.merge_strategy(PolicyKind::Escort), MergeStrategy::Max);
        assert_eq!(c.facets.conflict_severity(PolicyKind::Escort), Severity::Warning);
        c.validate().unwrap();
    }

    #[test]
    fn config_from_invalid_json() {
        let err = EngineConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn default_key_pattern() {
        let re = EngineConfig::default().permit_key_regex().unwrap();
        assert!(re.is_match("single_trip"));
        assert!(!re.is_match("Single Trip"));
    }
}
