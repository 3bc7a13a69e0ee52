use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, Result};

/// A validated WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let lat_ok = latitude.is_finite() && (-90.0..=90.0).contains(&latitude);
        let lon_ok = longitude.is_finite() && (-180.0..=180.0).contains(&longitude);
        if !lat_ok || !lon_ok {
            return Err(HeatmapError::InvalidCoordinate {
                lat: latitude,
                lon: longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Map viewport as sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Longitude span of a viewport. A viewport crossing the antimeridian
/// (`west > east`) matches `lon >= west OR lon <= east`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LonRange {
    Contiguous { west: f64, east: f64 },
    Wrapped { west: f64, east: f64 },
}

impl Bounds {
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
        let bounds = Self {
            north,
            south,
            east,
            west,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Builds bounds from optional query parameters: all four edges or none.
    pub fn from_parts(
        north: Option<f64>,
        south: Option<f64>,
        east: Option<f64>,
        west: Option<f64>,
    ) -> Result<Option<Self>> {
        match (north, south, east, west) {
            (None, None, None, None) => Ok(None),
            (Some(n), Some(s), Some(e), Some(w)) => Self::new(n, s, e, w).map(Some),
            _ => Err(HeatmapError::InvalidBounds(
                "north, south, east and west must be given together".to_string(),
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let edges = [self.north, self.south, self.east, self.west];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(HeatmapError::InvalidBounds(format!(
                "non-finite edge in {:?}",
                self
            )));
        }
        if self.south > self.north {
            return Err(HeatmapError::InvalidBounds(format!(
                "south {} is above north {}",
                self.south, self.north
            )));
        }
        Ok(())
    }

    pub fn lon_range(&self) -> LonRange {
        if self.west > self.east {
            LonRange::Wrapped {
                west: self.west,
                east: self.east,
            }
        } else {
            LonRange::Contiguous {
                west: self.west,
                east: self.east,
            }
        }
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        if latitude < self.south || latitude > self.north {
            return false;
        }
        match self.lon_range() {
            LonRange::Contiguous { west, east } => longitude >= west && longitude <= east,
            LonRange::Wrapped { west, east } => longitude >= west || longitude <= east,
        }
    }
}
