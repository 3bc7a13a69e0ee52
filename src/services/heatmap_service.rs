use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use tracing::debug;

use crate::database::location_repo::{self, LocationScope};
use crate::error::Result;
use crate::geo::{self, Bounds};
use crate::models::{ClusterResult, HeatmapFilters, LocationPointRow};
use crate::services::privacy_policy;

#[derive(Debug, Deserialize, Default)]
pub struct ClustersQuery {
    pub zoom: Option<i64>,
    pub north: Option<f64>,
    pub south: Option<f64>,
    pub east: Option<f64>,
    pub west: Option<f64>,
    pub affiliation_id: Option<String>,
    pub graduation_year: Option<i64>,
    pub country_code: Option<String>,
    pub major: Option<String>,
}

impl ClustersQuery {
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

/// Counts discoverable members per geohash cell at the precision matching
/// `zoom`. Bounds and filters are applied to raw records before grouping.
pub async fn aggregate(
    pool: &SqlitePool,
    zoom: i64,
    bounds: Option<Bounds>,
    filters: &HeatmapFilters,
) -> Result<Vec<ClusterResult>> {
    if let Some(b) = &bounds {
        b.validate()?;
    }
    let precision = geo::precision_for_zoom(zoom);
    let filters = filters.normalized();
    let scope = LocationScope {
        filters: &filters,
        bounds,
        geohash_prefix: None,
        exclude_owner_id: None,
    };

    let mut rows = location_repo::list_cluster_points(pool, &scope).await?;
    rows.retain(|r| filters.matches_major(r.major.as_deref()));
    let clusters = build_clusters(&rows, precision);

    debug!(
        zoom,
        precision,
        records = rows.len(),
        clusters = clusters.len(),
        "heatmap aggregate"
    );
    Ok(clusters)
}

#[derive(Default)]
struct CellSum {
    count: i64,
    lat_sum: f64,
    lon_sum: f64,
}

/// Groups points by geohash prefix. The centroid is the mean of the member
/// points; the cell center is used only when no finite mean exists.
pub fn build_clusters(rows: &[LocationPointRow], precision: usize) -> Vec<ClusterResult> {
    let mut cells: BTreeMap<&str, CellSum> = BTreeMap::new();

    for row in rows
        .iter()
        .filter(|r| privacy_policy::is_visible_in_aggregate(*r))
    {
        let end = precision.min(row.geohash.len());
        if end == 0 {
            continue;
        }
        let Some(prefix) = row.geohash.get(..end) else {
            continue;
        };
        let cell = cells.entry(prefix).or_default();
        cell.count += 1;
        cell.lat_sum += row.latitude;
        cell.lon_sum += row.longitude;
    }

    cells
        .into_iter()
        .map(|(prefix, cell)| {
            let mean_lat = cell.lat_sum / cell.count as f64;
            let mean_lon = cell.lon_sum / cell.count as f64;
            let (centroid_lat, centroid_lon) = if mean_lat.is_finite() && mean_lon.is_finite() {
                (mean_lat, mean_lon)
            } else {
                geo::geohash::center(prefix).unwrap_or((mean_lat, mean_lon))
            };
            ClusterResult {
                geohash_prefix: prefix.to_string(),
                count: cell.count,
                centroid_lat,
                centroid_lon,
                precision,
            }
        })
        .collect()
}
