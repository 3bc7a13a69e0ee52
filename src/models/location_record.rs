use serde::Serialize;

// Profile joined with its (optional) location row. Loaded before every write.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileLocationRow {
    pub owner_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub geohash: Option<String>,
    pub location: Option<String>,
    pub is_discoverable: i64,
    pub show_exact_location: i64,
}

// Minimal projection for cluster building.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationPointRow {
    pub owner_id: String,
    pub geohash: String,
    pub latitude: f64,
    pub longitude: f64,
    pub major: Option<String>,
    pub is_discoverable: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeohashCandidateRow {
    pub owner_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub geohash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    pub owner_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub geohash: String,
    pub location: String,
    pub is_discoverable: bool,
    pub show_exact_location: bool,
}

impl ProfileLocationRow {
    /// `None` while the profile has no coordinates attached yet.
    pub fn into_record(self) -> Option<LocationRecord> {
        let (latitude, longitude, geohash) = (self.latitude?, self.longitude?, self.geohash?);
        Some(LocationRecord {
            owner_id: self.owner_id,
            latitude,
            longitude,
            city: self.city,
            country: self.country,
            country_code: self.country_code,
            geohash,
            location: self.location.unwrap_or_default(),
            is_discoverable: self.is_discoverable == 1,
            show_exact_location: self.show_exact_location == 1,
        })
    }
}
