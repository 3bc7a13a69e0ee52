use crate::error::{HeatmapError, Result};
use crate::models::{AlumniMarkerRow, CallerContext, LocationPointRow, LocationRecord, Role};

/// Redacted coordinates carry two decimals (~1.1 km).
const REDACTED_DECIMALS: i32 = 2;

/// Anything carrying the profile-level discoverable flag.
pub trait Discoverable {
    fn is_discoverable(&self) -> bool;
}

impl Discoverable for LocationPointRow {
    fn is_discoverable(&self) -> bool {
        self.is_discoverable == 1
    }
}

impl Discoverable for AlumniMarkerRow {
    fn is_discoverable(&self) -> bool {
        self.is_discoverable == 1
    }
}

impl Discoverable for LocationRecord {
    fn is_discoverable(&self) -> bool {
        self.is_discoverable
    }
}

pub fn is_visible_in_aggregate<R: Discoverable>(record: &R) -> bool {
    record.is_discoverable()
}

pub fn is_visible_in_drilldown<R: Discoverable>(record: &R, caller: &CallerContext) -> bool {
    record.is_discoverable() && may_see_individuals(caller.role)
}

/// Only regular members ever see individual alumni. Administrators of any
/// kind are limited to aggregate counts.
pub fn may_see_individuals(role: Role) -> bool {
    match role {
        Role::RegularMember => true,
        Role::OrganizationAdmin | Role::SuperAdmin => false,
    }
}

pub fn ensure_drilldown_allowed(caller: &CallerContext) -> Result<()> {
    if may_see_individuals(caller.role) {
        Ok(())
    } else {
        Err(HeatmapError::ForbiddenRole(caller.role))
    }
}

pub fn redact(lat: f64, lon: f64, show_exact: bool) -> (f64, f64) {
    if show_exact {
        (lat, lon)
    } else {
        (round_to(lat, REDACTED_DECIMALS), round_to(lon, REDACTED_DECIMALS))
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
