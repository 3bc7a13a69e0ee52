use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::error::HeatmapError;
use crate::geo;
use crate::models::{CallerContext, ClusterResult, DrilldownPage};
use crate::services::drilldown_service::{self, DrilldownQuery, DrilldownRegion};
use crate::services::heatmap_service::{self, ClustersQuery};

pub const MIN_ZOOM: i64 = 1;
pub const MAX_ZOOM: i64 = 18;
pub const DEFAULT_ZOOM: i64 = 3;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Serialize)]
pub struct ClustersResponse {
    pub zoom: i64,
    pub precision: usize,
    pub total: i64,
    pub clusters: Vec<ClusterResult>,
}

// Any authenticated role may see counts.
pub async fn clusters_handler(
    Extension(_caller): Extension<CallerContext>,
    Query(query): Query<ClustersQuery>,
    State(pool): State<SqlitePool>,
) -> Result<Json<ClustersResponse>, HeatmapError> {
    let zoom = query.zoom.unwrap_or(DEFAULT_ZOOM).clamp(MIN_ZOOM, MAX_ZOOM);
    let bounds = query.bounds()?;
    let clusters = heatmap_service::aggregate(&pool, zoom, bounds, &query.filters()).await?;

    Ok(Json(ClustersResponse {
        zoom,
        precision: geo::precision_for_zoom(zoom),
        total: clusters.iter().map(|c| c.count).sum(),
        clusters,
    }))
}

pub async fn drilldown_handler(
    Extension(caller): Extension<CallerContext>,
    Query(query): Query<DrilldownQuery>,
    State(pool): State<SqlitePool>,
) -> Result<Json<DrilldownPage>, HeatmapError> {
    let region = DrilldownRegion {
        geohash_prefix: query.geohash_prefix()?,
        bounds: query.bounds()?,
    };
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query
        .page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    drilldown_service::drilldown(&pool, &caller, &region, &query.filters(), page, page_size)
        .await
        .map(Json)
}
