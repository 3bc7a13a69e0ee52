use serde::Serialize;

/// One heatmap cell. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    pub geohash_prefix: String,
    pub count: i64,
    pub centroid_lat: f64,
    pub centroid_lon: f64,
    pub precision: usize,
}
