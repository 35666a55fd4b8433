//! Boundary validation of matched-policy input.
//!
//! The detectors assume well-formed input and never fail. Callers receiving
//! policies from outside the process (JSON over a request boundary) should
//! run `validate_policies` first; `ConflictEngine::analyze` does this.

use std::collections::HashSet;

use regex::Regex;

use crate::condition::{Condition, ConditionValue, Operator};
use crate::config::EngineConfig;
use crate::error::{EngineResult, ValidationError};
use crate::output::PolicyOutput;
use crate::policy::{MatchedPolicy, PolicyId};

/// Conservative upper bound for free-form text fields.
pub const MAX_TEXT_LEN: usize = 16 * 1024;

/// Conservative upper bound for conditions on one policy.
pub const MAX_CONDITIONS: usize = 256;

fn validate_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.to_string(),
        });
    }
    validate_len(field, v)
}

fn validate_len(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.len() > MAX_TEXT_LEN {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

fn validate_optional_text(field: &str, value: Option<&str>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| validate_len(field, v))
}

fn invalid_condition(policy: &MatchedPolicy, condition: &Condition, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidCondition {
        policy_id: policy.id.clone(),
        condition_id: condition.id.clone(),
        reason: reason.into(),
    }
}

fn invalid_output(policy: &MatchedPolicy, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidOutput {
        policy_id: policy.id.clone(),
        reason: reason.into(),
    }
}

fn validate_condition(policy: &MatchedPolicy, condition: &Condition) -> Result<(), ValidationError> {
    if condition.id.trim().is_empty() {
        return Err(invalid_condition(policy, condition, "condition id is empty"));
    }
    if condition.value.numbers().iter().any(|v| !v.is_finite()) {
        return Err(invalid_condition(policy, condition, "numbers must be finite"));
    }

    match (condition.operator, &condition.value) {
        (Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte, ConditionValue::Number(_)) => Ok(()),
        (Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte, _) => Err(invalid_condition(
            policy,
            condition,
            format!("operator '{}' requires a number", condition.operator),
        )),
        (Operator::Eq | Operator::Neq, ConditionValue::Number(_) | ConditionValue::Text(_)) => Ok(()),
        (Operator::Eq | Operator::Neq, _) => Err(invalid_condition(
            policy,
            condition,
            format!("operator '{}' requires a single value", condition.operator),
        )),
        (Operator::Between, ConditionValue::Pair([low, high])) => {
            if low > high {
                Err(invalid_condition(
                    policy,
                    condition,
                    format!("between bounds are reversed ({low} > {high})"),
                ))
            } else {
                Ok(())
            }
        }
        (Operator::Between, _) => Err(invalid_condition(
            policy,
            condition,
            "operator 'between' requires a [low, high] pair",
        )),
        (Operator::In | Operator::NotIn, value) => {
            if value.members().is_empty() {
                Err(invalid_condition(
                    policy,
                    condition,
                    format!("operator '{}' requires a non-empty set", condition.operator),
                ))
            } else {
                Ok(())
            }
        }
    }
}

fn validate_output(policy: &MatchedPolicy, output: &PolicyOutput, key_pattern: &Regex) -> Result<(), ValidationError> {
    if output.facet() != policy.kind {
        return Err(ValidationError::OutputKindMismatch {
            policy_id: policy.id.clone(),
            kind: policy.kind,
            output: output.facet(),
        });
    }

    let positive = |field: &str, value: Option<f64>| match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(invalid_output(policy, format!("{field} must be a positive number")))
        }
        _ => Ok(()),
    };

    match output {
        PolicyOutput::Escort(o) => validate_optional_text("notes", o.notes.as_deref()),
        PolicyOutput::Utility(o) => {
            for t in &o.utility_types {
                validate_non_empty("utility_types", t)?;
            }
            validate_optional_text("notes", o.notes.as_deref())
        }
        PolicyOutput::Permit(o) => {
            if !key_pattern.is_match(&o.permit_type_key) {
                return Err(ValidationError::InvalidPermitTypeKey {
                    policy_id: policy.id.clone(),
                    key: o.permit_type_key.clone(),
                });
            }
            validate_non_empty("permit_type_label", &o.permit_type_label)?;
            if let Some(cost) = o.cost {
                if !(cost.min.is_finite() && cost.max.is_finite()) || cost.min < 0.0 || cost.min > cost.max {
                    return Err(invalid_output(policy, "cost range must satisfy 0 <= min <= max"));
                }
            }
            validate_optional_text("notes", o.notes.as_deref())
        }
        PolicyOutput::Speed(o) => {
            positive("max_speed_mph", o.max_speed_mph)?;
            positive("min_speed_mph", o.min_speed_mph)?;
            if let (Some(min), Some(max)) = (o.min_speed_mph, o.max_speed_mph) {
                if min > max {
                    return Err(invalid_output(policy, "min_speed_mph exceeds max_speed_mph"));
                }
            }
            validate_optional_text("notes", o.notes.as_deref())
        }
        PolicyOutput::Hours(o) => {
            if let (Some(start), Some(end)) = (o.allowed_start, o.allowed_end) {
                if start >= end {
                    return Err(invalid_output(policy, "allowed_start must be before allowed_end"));
                }
            }
            validate_optional_text("notes", o.notes.as_deref())
        }
        PolicyOutput::Route(o) => {
            for r in o.restricted_routes.iter().chain(&o.required_routes) {
                validate_non_empty("route", r)?;
            }
            validate_optional_text("notes", o.notes.as_deref())
        }
        PolicyOutput::Dimension(o) => {
            positive("max_width_ft", o.max_width_ft)?;
            positive("max_height_ft", o.max_height_ft)?;
            positive("max_length_ft", o.max_length_ft)?;
            positive("max_weight_lbs", o.max_weight_lbs)?;
            validate_optional_text("notes", o.notes.as_deref())
        }
    }
}

fn validate_policy(policy: &MatchedPolicy, key_pattern: &Regex) -> Result<(), ValidationError> {
    validate_non_empty("id", policy.id.as_str())?;
    validate_non_empty("name", &policy.name)?;
    validate_len("description", &policy.description)?;

    if policy.conditions.len() > MAX_CONDITIONS {
        return Err(ValidationError::FieldTooLong {
            field: "conditions".to_string(),
            max_length: MAX_CONDITIONS,
        });
    }
    for condition in &policy.conditions {
        validate_condition(policy, condition)?;
    }

    if let Some(output) = &policy.output {
        validate_output(policy, output, key_pattern)?;
    }
    Ok(())
}

/// Validates a matched-policy list against `config`.
///
/// # Errors
/// Returns `EngineError::Config` if the permit key pattern does not compile,
/// otherwise the first validation problem found, in input order.
pub fn validate_policies(policies: &[MatchedPolicy], config: &EngineConfig) -> EngineResult<()> {
    let key_pattern = config.permit_key_regex()?;
    validate_policies_with(policies, config.max_policies, &key_pattern)?;
    Ok(())
}

/// Validates with an already compiled permit key pattern.
///
/// # Errors
/// Returns the first problem found, in input order.
pub fn validate_policies_with(
    policies: &[MatchedPolicy],
    max_policies: usize,
    key_pattern: &Regex,
) -> Result<(), ValidationError> {
    if policies.len() > max_policies {
        return Err(ValidationError::TooManyPolicies {
            actual: policies.len(),
            max: max_policies,
        });
    }

    let mut seen: HashSet<&PolicyId> = HashSet::with_capacity(policies.len());
    for policy in policies {
        validate_policy(policy, key_pattern)?;
        if !seen.insert(&policy.id) {
            return Err(ValidationError::DuplicatePolicyId {
                id: policy.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::condition::{Attribute, SetMember};
    use crate::config::DEFAULT_MAX_POLICIES;
    use crate::error::EngineError;
    use crate::output::{EscortRequirement, HoursRequirement, PermitRequirement, SpeedRequirement};
    use crate::policy::PolicyKind;

    fn validate(policies: &[MatchedPolicy]) -> Result<(), ValidationError> {
        let pattern = EngineConfig::default().permit_key_regex().unwrap();
        validate_policies_with(policies, DEFAULT_MAX_POLICIES, &pattern)
    }

    fn permit(id: &str, key: &str) -> MatchedPolicy {
        MatchedPolicy::new(id, "Permit", PolicyKind::Permit).with_output(PermitRequirement::new(key, "Label"))
    }

    #[test]
    fn well_formed_input_passes() {
        let policies = vec![
            permit("a", "single_trip").with_condition(Condition::gt("c1", Attribute::WidthFt, 12.0)),
            MatchedPolicy::new("b", "Escort", PolicyKind::Escort).with_output(EscortRequirement::new(1, 1)),
        ];
        validate(&policies).unwrap();
        validate(&[]).unwrap();
    }

    #[test]
    fn rejects_empty_id_and_name() {
        let err = validate(&[MatchedPolicy::new(" ", "Name", PolicyKind::Speed)]).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { ref field } if field == "id"));

        let err = validate(&[MatchedPolicy::new("a", "", PolicyKind::Speed)]).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { ref field } if field == "name"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = validate(&[permit("a", "single_trip"), permit("a", "superload")]).unwrap_err();
        assert!(matches!(err, ValidationError::DuplicatePolicyId { .. }));
    }

    #[test]
    fn rejects_kind_output_mismatch() {
        let p = MatchedPolicy::new("a", "Mislabelled", PolicyKind::Permit).with_output(EscortRequirement::new(1, 0));
        let err = validate(&[p]).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutputKindMismatch {
                kind: PolicyKind::Permit,
                output: PolicyKind::Escort,
                ..
            }
        ));
    }

    #[test]
    fn rejects_bad_permit_key() {
        let err = validate(&[permit("a", "Single Trip")]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPermitTypeKey { .. }));
    }

    #[test]
    fn rejects_reversed_between() {
        let p = MatchedPolicy::new("a", "Speed", PolicyKind::Speed)
            .with_condition(Condition::between("c1", Attribute::LengthFt, 100.0, 80.0));
        assert!(matches!(validate(&[p]), Err(ValidationError::InvalidCondition { .. })));
    }

    #[test]
    fn rejects_operator_shape_mismatch() {
        let p = MatchedPolicy::new("a", "Speed", PolicyKind::Speed).with_condition(Condition::new(
            "c1",
            Attribute::WidthFt,
            Operator::Gt,
            ConditionValue::Text("wide".to_string()),
        ));
        assert!(validate(&[p]).is_err());

        let p = MatchedPolicy::new("b", "Speed", PolicyKind::Speed)
            .with_condition(Condition::in_set("c1", Attribute::State, Vec::<SetMember>::new()));
        assert!(validate(&[p]).is_err());
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let p = MatchedPolicy::new("a", "Speed", PolicyKind::Speed)
            .with_condition(Condition::gt("c1", Attribute::WidthFt, f64::NAN));
        assert!(validate(&[p]).is_err());
    }

    #[test]
    fn rejects_inverted_hours_window() {
        let p = MatchedPolicy::new("a", "Hours", PolicyKind::Hours).with_output(HoursRequirement {
            allowed_start: NaiveTime::from_hms_opt(18, 0, 0),
            allowed_end: NaiveTime::from_hms_opt(6, 0, 0),
            ..HoursRequirement::default()
        });
        assert!(matches!(validate(&[p]), Err(ValidationError::InvalidOutput { .. })));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let p = MatchedPolicy::new("a", "Speed", PolicyKind::Speed).with_output(SpeedRequirement {
            max_speed_mph: Some(0.0),
            ..SpeedRequirement::default()
        });
        assert!(validate(&[p]).is_err());
    }

    #[test]
    fn rejects_too_many_policies() {
        let config = EngineConfig::default().with_max_policies(1);
        let err = validate_policies(&[permit("a", "x"), permit("b", "y")], &config).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Validation(ValidationError::TooManyPolicies { actual: 2, max: 1 })
        ));
    }

    #[test]
    fn broken_key_pattern_is_a_config_error() {
        let config = EngineConfig {
            permit_type_key_pattern: "([a-z".to_string(),
            ..EngineConfig::default()
        };
        assert!(validate_policies(&[], &config).unwrap_err().is_config());
    }
}
