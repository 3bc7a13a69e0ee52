use std::fmt;

use serde::Serialize;

use crate::error::{HeatmapError, Result};
use crate::geo::point::GeoPoint;

pub const MIN_PRECISION: usize = 1;
/// Storage precision; every persisted geohash has this length.
pub const MAX_PRECISION: usize = 8;

/// A base-32 geohash of 1..=8 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Geohash(String);

impl Geohash {
    /// Validates caller-supplied text (e.g. a drill-down prefix).
    pub fn parse(raw: &str) -> Result<Self> {
        let hash = raw.trim().to_ascii_lowercase();
        check_length(&hash)?;
        decode_cell(&hash)?;
        Ok(Self(hash))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn precision(&self) -> usize {
        self.0.len()
    }

    /// Prefix of at most `precision` characters.
    pub fn truncate(&self, precision: usize) -> Geohash {
        let n = precision.clamp(MIN_PRECISION, self.0.len());
        Geohash(self.0[..n].to_string())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Geohash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cell covered by a geohash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBox {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

fn check_precision(precision: usize) -> Result<()> {
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(HeatmapError::InvalidInput(format!(
            "geohash precision {} outside {}..={}",
            precision, MIN_PRECISION, MAX_PRECISION
        )));
    }
    Ok(())
}

fn check_length(hash: &str) -> Result<()> {
    check_precision(hash.len()).map_err(|_| {
        HeatmapError::InvalidGeohash(format!("length {} outside 1..=8", hash.len()))
    })
}

// The top and east cells are closed at 90 and 180; points on those edges are
// pulled just inside before bit scaling so they cannot wrap to the far side.
const LAT_EDGE: f64 = 89.999_999_999;
const LON_EDGE: f64 = 179.999_999_999;

pub fn encode(lat: f64, lon: f64, precision: usize) -> Result<Geohash> {
    let point = GeoPoint::new(lat, lon)?;
    check_precision(precision)?;
    encode_point(&point, precision)
}

pub fn encode_point(point: &GeoPoint, precision: usize) -> Result<Geohash> {
    let coord = ::geohash::Coord {
        x: point.longitude().min(LON_EDGE),
        y: point.latitude().min(LAT_EDGE),
    };
    ::geohash::encode(coord, precision)
        .map(Geohash)
        .map_err(|_| HeatmapError::InvalidCoordinate {
            lat: point.latitude(),
            lon: point.longitude(),
        })
}

fn decode_cell(hash: &str) -> Result<GeoBox> {
    let rect = ::geohash::decode_bbox(hash)
        .map_err(|e| HeatmapError::InvalidGeohash(format!("'{}': {}", hash, e)))?;
    Ok(GeoBox {
        lat_min: rect.min().y,
        lat_max: rect.max().y,
        lon_min: rect.min().x,
        lon_max: rect.max().x,
    })
}

/// Cell covered by `hash`; accepts mixed case and surrounding whitespace.
pub fn decode(hash: &str) -> Result<GeoBox> {
    let hash = hash.trim().to_ascii_lowercase();
    check_length(&hash)?;
    decode_cell(&hash)
}

pub fn center(hash: &str) -> Result<(f64, f64)> {
    decode(hash).map(|b| b.center())
}
