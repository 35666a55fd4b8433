//! Most-restrictive merges for ceiling/floor facets.
//!
//! Each limit takes the tightest value present; absent limits do not loosen
//! a present one. Set-valued fields take the deduplicated union.

use chrono::NaiveTime;

use crate::merge::{concat_notes, push_unique};
use crate::output::{DimensionRequirement, HoursRequirement, RouteRequirement, SpeedRequirement};

fn tighter_ceiling(current: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (current, next) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (v, None) | (None, v) => v,
    }
}

fn tighter_floor(current: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (current, next) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (v, None) | (None, v) => v,
    }
}

fn later(current: Option<NaiveTime>, next: Option<NaiveTime>) -> Option<NaiveTime> {
    current.max(next)
}

fn earlier(current: Option<NaiveTime>, next: Option<NaiveTime>) -> Option<NaiveTime> {
    match (current, next) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (v, None) | (None, v) => v,
    }
}

/// Lowest maximum speed, highest minimum speed.
#[must_use]
pub fn merge_speed_requirements<'a, I>(requirements: I) -> SpeedRequirement
where
    I: IntoIterator<Item = &'a SpeedRequirement>,
{
    let mut merged = SpeedRequirement::default();
    let mut notes = Vec::new();
    for req in requirements {
        merged.max_speed_mph = tighter_ceiling(merged.max_speed_mph, req.max_speed_mph);
        merged.min_speed_mph = tighter_floor(merged.min_speed_mph, req.min_speed_mph);
        notes.push(req.notes.as_deref());
    }
    merged.notes = concat_notes(notes);
    merged
}

/// Intersects travel windows and OR-s every prohibition.
///
/// The window is treated as same-day; an intersection where start is after
/// end means no common travel window and is kept as-is.
#[must_use]
pub fn merge_hours_requirements<'a, I>(requirements: I) -> HoursRequirement
where
    I: IntoIterator<Item = &'a HoursRequirement>,
{
    let mut merged = HoursRequirement::default();
    let mut notes = Vec::new();
    for req in requirements {
        merged.daylight_only |= req.daylight_only;
        merged.no_weekends |= req.no_weekends;
        merged.no_holidays |= req.no_holidays;
        merged.allowed_start = later(merged.allowed_start, req.allowed_start);
        merged.allowed_end = earlier(merged.allowed_end, req.allowed_end);
        notes.push(req.notes.as_deref());
    }
    merged.notes = concat_notes(notes);
    merged
}

/// Unions restricted and required routes, keeping first-seen order.
#[must_use]
pub fn merge_route_requirements<'a, I>(requirements: I) -> RouteRequirement
where
    I: IntoIterator<Item = &'a RouteRequirement>,
{
    let mut merged = RouteRequirement::default();
    let mut notes = Vec::new();
    for req in requirements {
        for r in &req.restricted_routes {
            push_unique(&mut merged.restricted_routes, r);
        }
        for r in &req.required_routes {
            push_unique(&mut merged.required_routes, r);
        }
        notes.push(req.notes.as_deref());
    }
    merged.notes = concat_notes(notes);
    merged
}

/// Lowest of every dimension limit.
#[must_use]
pub fn merge_dimension_requirements<'a, I>(requirements: I) -> DimensionRequirement
where
    I: IntoIterator<Item = &'a DimensionRequirement>,
{
    let mut merged = DimensionRequirement::default();
    let mut notes = Vec::new();
    for req in requirements {
        merged.max_width_ft = tighter_ceiling(merged.max_width_ft, req.max_width_ft);
        merged.max_height_ft = tighter_ceiling(merged.max_height_ft, req.max_height_ft);
        merged.max_length_ft = tighter_ceiling(merged.max_length_ft, req.max_length_ft);
        merged.max_weight_lbs = tighter_ceiling(merged.max_weight_lbs, req.max_weight_lbs);
        notes.push(req.notes.as_deref());
    }
    merged.notes = concat_notes(notes);
    merged
}
