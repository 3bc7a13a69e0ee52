use thiserror::Error;

use crate::models::Role;

pub type Result<T> = std::result::Result<T, HeatmapError>;

#[derive(Error, Debug)]
pub enum HeatmapError {
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid geohash: {0}")]
    InvalidGeohash(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Role {0:?} may not view individual records")]
    ForbiddenRole(Role),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl HeatmapError {
    /// Stable machine-readable code for transport layers and audit logs.
    pub fn code(&self) -> &'static str {
        match self {
            HeatmapError::InvalidCoordinate { .. } => "invalid_coordinate",
            HeatmapError::InvalidBounds(_) => "invalid_bounds",
            HeatmapError::InvalidGeohash(_) => "invalid_geohash",
            HeatmapError::InvalidInput(_) => "invalid_input",
            HeatmapError::ProfileNotFound(_) => "profile_not_found",
            HeatmapError::ForbiddenRole(_) => "forbidden_role",
            HeatmapError::Database(_) => "database_error",
        }
    }
}
