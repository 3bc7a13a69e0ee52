pub mod database;
pub mod error;
pub mod geo;
pub mod models;
pub mod services;
pub mod web;

pub use error::{HeatmapError, Result};
