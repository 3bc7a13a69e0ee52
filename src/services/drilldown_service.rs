use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::database::location_repo::{self, LocationScope};
use crate::error::Result;
use crate::geo::{Bounds, Geohash};
use crate::models::{AlumniMarker, AlumniMarkerRow, CallerContext, DrilldownPage, HeatmapFilters};
use crate::services::privacy_policy;

#[derive(Debug, Deserialize, Default)]
pub struct DrilldownQuery {
    pub geohash: Option<String>,
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub affiliation_id: Option<String>,
    pub graduation_year: Option<i64>,
    pub country_code: Option<String>,
    pub major: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl DrilldownQuery {
    pub fn geohash_prefix(&self) -> Result<Option<Geohash>> {
        self.geohash
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Geohash::parse)
            .transpose()
    }

    pub fn bounds(&self) -> Result<Option<Bounds>> {
        Bounds::from_parts(self.north, self.south, self.east, self.west)
    }

    pub fn filters(&self) -> HeatmapFilters {
        HeatmapFilters {
            affiliation_id: self.affiliation_id.clone(),
            graduation_year: self.graduation_year,
            country_code: self.country_code.clone(),
            major: self.major.clone(),
        }
    }
}

/// Region selector for a drill-down; either or both may be set.
#[derive(Debug, Clone, Default)]
pub struct DrilldownRegion {
    pub geohash_prefix: Option<Geohash>,
    pub bounds: Option<Bounds>,
}

/// Lists individual alumni in a region for a member caller. Page is
/// 1-indexed; page size limits are the caller's responsibility.
pub async fn drilldown(
    pool: &SqlitePool,
    caller: &CallerContext,
    region: &DrilldownRegion,
    filters: &HeatmapFilters,
    page: i64,
    page_size: i64,
) -> Result<DrilldownPage> {
    if let Err(e) = privacy_policy::ensure_drilldown_allowed(caller) {
        warn!(
            owner_id = %caller.owner_id,
            role = caller.role.as_str(),
            "heatmap drilldown denied"
        );
        return Err(e);
    }

    if let Some(b) = &region.bounds {
        b.validate()?;
    }

    let page = page.max(1);
    let page_size = page_size.max(1);
    let filters = filters.normalized();
    let scope = LocationScope {
        filters: &filters,
        bounds: region.bounds,
        geohash_prefix: region.geohash_prefix.as_ref(),
        exclude_owner_id: Some(caller.owner_id.as_str()),
    };

    let offset = (page - 1).saturating_mul(page_size);
    let (total, rows): (i64, Vec<AlumniMarkerRow>) = if filters.major.is_none() {
        let total = location_repo::count_markers(pool, &scope).await?;
        let rows = location_repo::list_markers(pool, &scope, Some((page_size, offset))).await?;
        (total, rows)
    } else {
        // Major matching is Unicode case-folded in Rust, so count and page
        // over the matched rows.
        let matched: Vec<_> = location_repo::list_markers(pool, &scope, None)
            .await?
            .into_iter()
            .filter(|r| filters.matches_major(r.major.as_deref()))
            .collect();
        let total = matched.len() as i64;
        let rows = matched
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .collect();
        (total, rows)
    };

    // The SQL scope already enforces visibility; items must stay in step
    // with `total`.
    debug_assert!(rows
        .iter()
        .all(|r| privacy_policy::is_visible_in_drilldown(r, caller)));
    let items: Vec<AlumniMarker> = rows.into_iter().map(to_marker).collect();

    info!(
        owner_id = %caller.owner_id,
        prefix = region.geohash_prefix.as_ref().map(|g| g.as_str()).unwrap_or(""),
        total,
        page,
        returned = items.len(),
        "heatmap drilldown"
    );

    Ok(DrilldownPage {
        items,
        total,
        has_more: total > page.saturating_mul(page_size),
        page,
        page_size,
    })
}

fn to_marker(row: AlumniMarkerRow) -> AlumniMarker {
    let show_exact = row.show_exact_location == 1;
    let (latitude, longitude) = privacy_policy::redact(row.latitude, row.longitude, show_exact);
    AlumniMarker {
        name: row
            .display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Alumnus".to_string()),
        owner_id: row.owner_id,
        avatar_url: row.avatar_url,
        graduation_year: row.graduation_year,
        major: row.major,
        affiliation: row.affiliation_name,
        job_title: row.job_title,
        company: row.company,
        city: row.city,
        country: row.country,
        latitude,
        longitude,
        is_exact_location: show_exact,
    }
}
