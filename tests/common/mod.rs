#![allow(dead_code)]

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use heatmap::database::schema;
use heatmap::models::Role;
use heatmap::services::location_update_service::{self, LocationUpdate};

// One connection: every connection to `sqlite::memory:` is its own database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    schema::ensure_schema(&pool).await.expect("schema bootstrap");
    pool
}

pub struct ProfileSeed<'a> {
    pub owner_id: &'a str,
    pub display_name: &'a str,
    pub role: Role,
    pub affiliation_id: Option<&'a str>,
    pub graduation_year: Option<i64>,
    pub major: Option<&'a str>,
    pub is_discoverable: bool,
    pub show_exact_location: bool,
}

impl<'a> ProfileSeed<'a> {
    pub fn member(owner_id: &'a str, display_name: &'a str) -> Self {
        Self {
            owner_id,
            display_name,
            role: Role::RegularMember,
            affiliation_id: None,
            graduation_year: None,
            major: None,
            is_discoverable: true,
            show_exact_location: false,
        }
    }
}

pub async fn insert_profile(pool: &SqlitePool, seed: &ProfileSeed<'_>) {
    sqlx::query(
        r#"
INSERT INTO alumni_profiles (
  owner_id, display_name, graduation_year, major, affiliation_id,
  affiliation_name, role, is_discoverable, show_exact_location
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#,
    )
    .bind(seed.owner_id)
    .bind(seed.display_name)
    .bind(seed.graduation_year)
    .bind(seed.major)
    .bind(seed.affiliation_id)
    .bind(seed.affiliation_id.map(|a| format!("Affiliation {}", a)))
    .bind(seed.role.as_str())
    .bind(i64::from(seed.is_discoverable))
    .bind(i64::from(seed.show_exact_location))
    .execute(pool)
    .await
    .expect("insert profile");
}

pub async fn place(pool: &SqlitePool, owner_id: &str, lat: f64, lon: f64) {
    location_update_service::update_location(
        pool,
        owner_id,
        &LocationUpdate {
            latitude: lat,
            longitude: lon,
            city: None,
            country: None,
            country_code: None,
        },
    )
    .await
    .expect("update location");
}

pub async fn seed_at(pool: &SqlitePool, seed: &ProfileSeed<'_>, lat: f64, lon: f64) {
    insert_profile(pool, seed).await;
    place(pool, seed.owner_id, lat, lon).await;
}

pub const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
pub const BROOKLYN: (f64, f64) = (40.7306, -73.9352);
pub const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);
