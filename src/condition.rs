//! Trigger conditions and their overlap semantics.
//!
//! Each condition constrains one load attribute. For overlap detection a
//! condition is reduced to a [`TriggerDomain`]: a numeric interval, a value
//! set, or unbounded when the shape cannot be interpreted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Load attributes a condition can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    /// Overall width in feet.
    WidthFt,
    /// Overall height in feet.
    HeightFt,
    /// Overall length in feet.
    LengthFt,
    /// Gross weight in pounds.
    WeightLbs,
    /// Heaviest axle weight in pounds.
    AxleWeightLbs,
    /// Number of axles.
    AxleCount,
    /// Front overhang in feet.
    FrontOverhangFt,
    /// Rear overhang in feet.
    RearOverhangFt,
    /// Jurisdiction code (e.g. `TX`).
    State,
    /// Road classification (e.g. `interstate`).
    RouteType,
    /// Day of travel (e.g. `saturday`).
    TravelDay,
    /// Hour of travel, 0-23.
    TravelHour,
}

impl Attribute {
    /// Returns the stable snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WidthFt => "width_ft",
            Self::HeightFt => "height_ft",
            Self::LengthFt => "length_ft",
            Self::WeightLbs => "weight_lbs",
            Self::AxleWeightLbs => "axle_weight_lbs",
            Self::AxleCount => "axle_count",
            Self::FrontOverhangFt => "front_overhang_ft",
            Self::RearOverhangFt => "rear_overhang_ft",
            Self::State => "state",
            Self::RouteType => "route_type",
            Self::TravelDay => "travel_day",
            Self::TravelHour => "travel_hour",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Strictly greater than.
    #[serde(rename = ">")]
    Gt,
    /// Greater than or equal.
    #[serde(rename = ">=")]
    Gte,
    /// Strictly less than.
    #[serde(rename = "<")]
    Lt,
    /// Less than or equal.
    #[serde(rename = "<=")]
    Lte,
    /// Equal to a single value.
    #[serde(rename = "=")]
    Eq,
    /// Not equal; unbounded for overlap.
    #[serde(rename = "!=")]
    Neq,
    /// Inside a closed `[low, high]` pair.
    #[serde(rename = "between")]
    Between,
    /// Member of a value set.
    #[serde(rename = "in")]
    In,
    /// Not a member of a value set.
    #[serde(rename = "not_in")]
    NotIn,
}

impl Operator {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Between => "between",
            Self::In => "in",
            Self::NotIn => "not_in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One member of a value set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetMember {
    /// A numeric member.
    Number(f64),
    /// A text member such as a state code.
    Text(String),
}

impl SetMember {
    /// Returns the numeric value, if this member is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl From<f64> for SetMember {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for SetMember {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// The comparison value of a condition.
///
/// Untagged on the wire: `12`, `"TX"`, `[10, 14]` or `["TX", "OK", "NM"]`.
/// A two-number array always parses as `Pair`; set operators read it as a
/// two-member set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    /// A single number.
    Number(f64),
    /// A single text value.
    Text(String),
    /// A `[low, high]` pair.
    Pair([f64; 2]),
    /// A list of set members.
    Set(Vec<SetMember>),
}

impl ConditionValue {
    /// Returns the value as set members.
    #[must_use]
    pub fn members(&self) -> Vec<SetMember> {
        match self {
            Self::Number(v) => vec![SetMember::Number(*v)],
            Self::Text(s) => vec![SetMember::Text(s.clone())],
            Self::Pair([a, b]) => vec![SetMember::Number(*a), SetMember::Number(*b)],
            Self::Set(members) => members.clone(),
        }
    }

    /// Returns every number carried by the value.
    #[must_use]
    pub fn numbers(&self) -> Vec<f64> {
        match self {
            Self::Number(v) => vec![*v],
            Self::Text(_) => Vec::new(),
            Self::Pair([a, b]) => vec![*a, *b],
            Self::Set(members) => members.iter().filter_map(SetMember::as_number).collect(),
        }
    }
}

/// A closed numeric interval; bounds may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub low: f64,
    /// Upper bound.
    pub high: f64,
}

impl Interval {
    /// Creates an interval.
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns true if `max(low) <= min(high)`.
    ///
    /// Bounds are compared as closed, so `> 12` and `< 12` touch at 12 and
    /// count as overlapping.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.low.max(other.low) <= self.high.min(other.high)
    }

    /// Returns true if `value` lies within the interval.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// The set of attribute values on which a condition triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerDomain {
    /// A numeric range.
    Range(Interval),
    /// An explicit value set.
    Members(Vec<SetMember>),
    /// Could trigger on any value.
    Unbounded,
}

impl TriggerDomain {
    /// Returns true if the two domains share at least one value.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unbounded, _) | (_, Self::Unbounded) => true,
            (Self::Range(a), Self::Range(b)) => a.overlaps(b),
            (Self::Members(a), Self::Members(b)) => a.iter().any(|m| b.contains(m)),
            (Self::Range(range), Self::Members(members))
            | (Self::Members(members), Self::Range(range)) => members
                .iter()
                .filter_map(SetMember::as_number)
                .any(|v| range.contains(v)),
        }
    }
}

/// A trigger condition on a single attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Identifier, unique within its policy.
    pub id: String,
    /// Attribute under test.
    pub attribute: Attribute,
    /// Comparison operator.
    pub operator: Operator,
    /// Comparison value.
    pub value: ConditionValue,
}

impl Condition {
    /// Creates a condition.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        attribute: Attribute,
        operator: Operator,
        value: ConditionValue,
    ) -> Self {
        Self {
            id: id.into(),
            attribute,
            operator,
            value,
        }
    }

    /// `attribute > value`
    #[must_use]
    pub fn gt(id: impl Into<String>, attribute: Attribute, value: f64) -> Self {
        Self::new(id, attribute, Operator::Gt, ConditionValue::Number(value))
    }

    /// `attribute >= value`
    #[must_use]
    pub fn gte(id: impl Into<String>, attribute: Attribute, value: f64) -> Self {
        Self::new(id, attribute, Operator::Gte, ConditionValue::Number(value))
    }

    /// `attribute < value`
    #[must_use]
    pub fn lt(id: impl Into<String>, attribute: Attribute, value: f64) -> Self {
        Self::new(id, attribute, Operator::Lt, ConditionValue::Number(value))
    }

    /// `attribute <= value`
    #[must_use]
    pub fn lte(id: impl Into<String>, attribute: Attribute, value: f64) -> Self {
        Self::new(id, attribute, Operator::Lte, ConditionValue::Number(value))
    }

    /// `attribute = value`
    #[must_use]
    pub fn equals(id: impl Into<String>, attribute: Attribute, value: ConditionValue) -> Self {
        Self::new(id, attribute, Operator::Eq, value)
    }

    /// `attribute between [low, high]`
    #[must_use]
    pub fn between(id: impl Into<String>, attribute: Attribute, low: f64, high: f64) -> Self {
        Self::new(id, attribute, Operator::Between, ConditionValue::Pair([low, high]))
    }

    /// `attribute in members`
    #[must_use]
    pub fn in_set(id: impl Into<String>, attribute: Attribute, members: Vec<SetMember>) -> Self {
        Self::new(id, attribute, Operator::In, ConditionValue::Set(members))
    }

    /// `attribute not_in members`
    #[must_use]
    pub fn not_in(id: impl Into<String>, attribute: Attribute, members: Vec<SetMember>) -> Self {
        Self::new(id, attribute, Operator::NotIn, ConditionValue::Set(members))
    }

    /// Reduces the condition to the values on which it triggers.
    ///
    /// Shapes that do not fit the operator (a set under `>`, text under
    /// `between`) and `!=` are unbounded.
    #[must_use]
    pub fn domain(&self) -> TriggerDomain {
        use ConditionValue as V;

        match (self.operator, &self.value) {
            (Operator::Gt | Operator::Gte, V::Number(v)) => {
                TriggerDomain::Range(Interval::new(*v, f64::INFINITY))
            }
            (Operator::Lt | Operator::Lte, V::Number(v)) => {
                TriggerDomain::Range(Interval::new(f64::NEG_INFINITY, *v))
            }
            (Operator::Eq | Operator::Between, V::Number(v)) => {
                TriggerDomain::Range(Interval::new(*v, *v))
            }
            (Operator::Eq, V::Text(s)) => TriggerDomain::Members(vec![SetMember::Text(s.clone())]),
            (Operator::Between, V::Pair([low, high])) => {
                TriggerDomain::Range(Interval::new(*low, *high))
            }
            (Operator::In | Operator::NotIn, value) => TriggerDomain::Members(value.members()),
            _ => TriggerDomain::Unbounded,
        }
    }

    /// Returns true if both conditions test the same attribute and their
    /// trigger domains intersect.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.attribute == other.attribute && self.domain().intersects(&other.domain())
    }
}
