//! Error types for the conflict engine.
//!
//! Detection, merging and resolution are infallible. Errors only come from
//! the validating boundary (`ConflictEngine::analyze`) and from building an
//! engine out of an invalid configuration.

use thiserror::Error;

use crate::policy::{PolicyId, PolicyKind};

/// Validation errors raised against matched-policy input.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Field '{field}' exceeds maximum length of {max_length}")]
    FieldTooLong {
        field: String,
        max_length: usize,
    },

    #[error("Too many matched policies: {actual} (max: {max})")]
    TooManyPolicies {
        actual: usize,
        max: usize,
    },

    #[error("Duplicate policy id: {id}")]
    DuplicatePolicyId {
        id: PolicyId,
    },

    #[error("Policy {policy_id} is of kind '{kind}' but carries a '{output}' output")]
    OutputKindMismatch {
        policy_id: PolicyId,
        kind: PolicyKind,
        output: PolicyKind,
    },

    #[error("Invalid condition '{condition_id}' on policy {policy_id}: {reason}")]
    InvalidCondition {
        policy_id: PolicyId,
        condition_id: String,
        reason: String,
    },

    #[error("Invalid permit type key '{key}' on policy {policy_id}")]
    InvalidPermitTypeKey {
        policy_id: PolicyId,
        key: String,
    },

    #[error("Invalid output on policy {policy_id}: {reason}")]
    InvalidOutput {
        policy_id: PolicyId,
        reason: String,
    },
}

/// Errors raised while building an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Facet '{kind}' cannot merge with strategy '{strategy}'")]
    UnsupportedMergeStrategy {
        kind: PolicyKind,
        strategy: String,
    },

    #[error("Invalid permit type key pattern '{pattern}': {reason}")]
    InvalidKeyPattern {
        pattern: String,
        reason: String,
    },

    #[error("max_policies must be > 0")]
    ZeroPolicyLimit,

    #[error("Failed to parse configuration: {message}")]
    Parse {
        message: String,
    },
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
