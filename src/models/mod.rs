pub mod alumni_marker;
pub mod caller;
pub mod cluster;
pub mod heatmap_filters;
pub mod location_record;

pub use alumni_marker::{AlumniMarker, AlumniMarkerRow, DrilldownPage};
pub use caller::{CallerContext, Role};
pub use cluster::ClusterResult;
pub use heatmap_filters::HeatmapFilters;
pub use location_record::{GeohashCandidateRow, LocationPointRow, LocationRecord, ProfileLocationRow};
