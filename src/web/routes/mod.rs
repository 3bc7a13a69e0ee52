pub mod heatmap;
pub mod location;
