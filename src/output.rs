//! Typed requirement payloads produced by matched policies.
//!
//! `PolicyOutput` is tagged by facet on the wire (`"kind": "escort"`). The
//! merge engine buckets outputs by variant, so a policy whose `kind` and
//! output disagree is merged under the facet its output actually is.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::policy::PolicyKind;

/// Pilot/escort vehicle requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EscortRequirement {
    /// Escort vehicles ahead of the load.
    pub front_escorts: u32,
    /// Escort vehicles behind the load.
    pub rear_escorts: u32,
    /// Whether the front escort must carry a height pole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_has_height_pole: Option<bool>,
    /// Whether the rear escort must carry a height pole.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_has_height_pole: Option<bool>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl EscortRequirement {
    /// Creates a requirement with the given escort counts.
    #[must_use]
    pub fn new(front_escorts: u32, rear_escorts: u32) -> Self {
        Self {
            front_escorts,
            rear_escorts,
            ..Self::default()
        }
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Advance notice to utility owners along the route.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UtilityNoticeRequirement {
    /// Minimum lead time before the move, in hours.
    pub notice_hours: u32,
    /// Utility owners to notify (e.g. `electric`).
    #[serde(default)]
    pub utility_types: Vec<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UtilityNoticeRequirement {
    /// Creates a requirement.
    #[must_use]
    pub fn new<S: Into<String>>(notice_hours: u32, utility_types: impl IntoIterator<Item = S>) -> Self {
        Self {
            notice_hours,
            utility_types: utility_types.into_iter().map(Into::into).collect(),
            notes: None,
        }
    }
}

/// Estimated permit cost, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

/// Permit type requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitRequirement {
    /// Machine key, e.g. `single_trip` or `superload`.
    pub permit_type_key: String,
    /// Display label for the permit type.
    pub permit_type_label: String,
    /// Estimated cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<CostRange>,
    /// Typical processing time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_days: Option<u32>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl PermitRequirement {
    /// Creates a requirement with a key and label.
    #[must_use]
    pub fn new(permit_type_key: impl Into<String>, permit_type_label: impl Into<String>) -> Self {
        Self {
            permit_type_key: permit_type_key.into(),
            permit_type_label: permit_type_label.into(),
            cost: None,
            processing_days: None,
            notes: None,
        }
    }
}

/// Speed restriction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpeedRequirement {
    /// Upper speed limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_speed_mph: Option<f64>,
    /// Lower speed limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_speed_mph: Option<f64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Travel-hour restriction.
///
/// `allowed_start`/`allowed_end` bound a same-day travel window.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoursRequirement {
    /// Travel only between sunrise and sunset.
    #[serde(default)]
    pub daylight_only: bool,
    /// Earliest allowed departure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_start: Option<NaiveTime>,
    /// Latest allowed travel time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_end: Option<NaiveTime>,
    /// No travel on Saturday or Sunday.
    #[serde(default)]
    pub no_weekends: bool,
    /// No travel on holidays.
    #[serde(default)]
    pub no_holidays: bool,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Route restrictions and mandates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteRequirement {
    /// Routes the load must not use.
    #[serde(default)]
    pub restricted_routes: Vec<String>,
    /// Routes the load must use.
    #[serde(default)]
    pub required_routes: Vec<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Dimension and weight limits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DimensionRequirement {
    /// Maximum width in feet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width_ft: Option<f64>,
    /// Maximum height in feet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height_ft: Option<f64>,
    /// Maximum length in feet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length_ft: Option<f64>,
    /// Maximum gross weight in pounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight_lbs: Option<f64>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The requirement a policy yields, one variant per facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PolicyOutput {
    Escort(EscortRequirement),
    Permit(PermitRequirement),
    Speed(SpeedRequirement),
    Hours(HoursRequirement),
    Route(RouteRequirement),
    Utility(UtilityNoticeRequirement),
    Dimension(DimensionRequirement),
}

impl PolicyOutput {
    /// Returns the facet this output's shape belongs to.
    #[must_use]
    pub const fn facet(&self) -> PolicyKind {
        match self {
            Self::Escort(_) => PolicyKind::Escort,
            Self::Permit(_) => PolicyKind::Permit,
            Self::Speed(_) => PolicyKind::Speed,
            Self::Hours(_) => PolicyKind::Hours,
            Self::Route(_) => PolicyKind::Route,
            Self::Utility(_) => PolicyKind::Utility,
            Self::Dimension(_) => PolicyKind::Dimension,
        }
    }

    /// Returns the escort requirement, if this is one.
    #[must_use]
    pub const fn as_escort(&self) -> Option<&EscortRequirement> {
        match self {
            Self::Escort(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the permit requirement, if this is one.
    #[must_use]
    pub const fn as_permit(&self) -> Option<&PermitRequirement> {
        match self {
            Self::Permit(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the speed requirement, if this is one.
    #[must_use]
    pub const fn as_speed(&self) -> Option<&SpeedRequirement> {
        match self {
            Self::Speed(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the hours requirement, if this is one.
    #[must_use]
    pub const fn as_hours(&self) -> Option<&HoursRequirement> {
        match self {
            Self::Hours(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the route requirement, if this is one.
    #[must_use]
    pub const fn as_route(&self) -> Option<&RouteRequirement> {
        match self {
            Self::Route(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the utility notice requirement, if this is one.
    #[must_use]
    pub const fn as_utility(&self) -> Option<&UtilityNoticeRequirement> {
        match self {
            Self::Utility(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the dimension requirement, if this is one.
    #[must_use]
    pub const fn as_dimension(&self) -> Option<&DimensionRequirement> {
        match self {
            Self::Dimension(v) => Some(v),
            _ => None,
        }
    }
}

impl From<EscortRequirement> for PolicyOutput {
    fn from(value: EscortRequirement) -> Self {
        Self::Escort(value)
    }
}

impl From<PermitRequirement> for PolicyOutput {
    fn from(value: PermitRequirement) -> Self {
        Self::Permit(value)
    }
}

impl From<SpeedRequirement> for PolicyOutput {
    fn from(value: SpeedRequirement) -> Self {
        Self::Speed(value)
    }
}

impl From<HoursRequirement> for PolicyOutput {
    fn from(value: HoursRequirement) -> Self {
        Self::Hours(value)
    }
}

impl From<RouteRequirement> for PolicyOutput {
    fn from(value: RouteRequirement) -> Self {
        Self::Route(value)
    }
}

impl From<UtilityNoticeRequirement> for PolicyOutput {
    fn from(value: UtilityNoticeRequirement) -> Self {
        Self::Utility(value)
    }
}

impl From<DimensionRequirement> for PolicyOutput {
    fn from(value: DimensionRequirement) -> Self {
        Self::Dimension(value)
    }
}
