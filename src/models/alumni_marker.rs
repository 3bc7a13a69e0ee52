use serde::Serialize;

// Row for the drill-down list (profile attributes + raw coordinates).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlumniMarkerRow {
    pub owner_id: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub graduation_year: Option<i64>,
    pub major: Option<String>,
    pub affiliation_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_discoverable: i64,
    pub show_exact_location: i64,
}

/// Privacy-filtered projection sent to members. Coordinates are already
/// redacted when `is_exact_location` is false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlumniMarker {
    pub owner_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub graduation_year: Option<i64>,
    pub major: Option<String>,
    pub affiliation: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_exact_location: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrilldownPage {
    pub items: Vec<AlumniMarker>,
    pub total: i64,
    pub has_more: bool,
    pub page: i64,
    pub page_size: i64,
}
