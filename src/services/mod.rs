pub mod drilldown_service;
pub mod heatmap_service;
pub mod location_update_service;
pub mod privacy_policy;
