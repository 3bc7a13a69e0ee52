use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::database::location_repo::{self, UpsertLocation};
use crate::error::{HeatmapError, Result};
use crate::geo::{geohash, GeoPoint, MAX_PRECISION};
use crate::models::LocationRecord;
use crate::services::privacy_policy::Discoverable;

const MAX_COUNTRY_CODE_LEN: usize = 3;

#[derive(Debug, Clone, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrivacySettingsUpdate {
    pub is_discoverable: Option<bool>,
    pub show_exact_location: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivacySettings {
    pub is_discoverable: bool,
    pub show_exact_location: bool,
}

/// Attaches coordinates to an existing profile. The geohash is always
/// re-derived at full precision from the new coordinates; omitted optional
/// fields keep their stored value. Concurrent writes for one owner are
/// last-write-wins.
pub async fn update_location(
    pool: &SqlitePool,
    owner_id: &str,
    update: &LocationUpdate,
) -> Result<LocationRecord> {
    let point = GeoPoint::new(update.latitude, update.longitude)?;
    let country_code = normalize_country_code(update.country_code.as_deref())?;

    let Some(existing) = location_repo::load_profile_location(pool, owner_id).await? else {
        return Err(HeatmapError::ProfileNotFound(owner_id.to_string()));
    };

    let city = clean(update.city.as_deref()).or(existing.city);
    let country = clean(update.country.as_deref()).or(existing.country);
    let country_code = country_code.or(existing.country_code);
    let hash = geohash::encode_point(&point, MAX_PRECISION)?;
    let location = build_location_label(city.as_deref(), country.as_deref());

    location_repo::upsert_location(
        pool,
        UpsertLocation {
            owner_id,
            latitude: point.latitude(),
            longitude: point.longitude(),
            city: city.as_deref(),
            country: country.as_deref(),
            country_code: country_code.as_deref(),
            geohash: hash.as_str(),
            location: &location,
        },
    )
    .await?;

    let record = LocationRecord {
        owner_id: owner_id.to_string(),
        latitude: point.latitude(),
        longitude: point.longitude(),
        city,
        country,
        country_code,
        geohash: hash.into_string(),
        location,
        is_discoverable: existing.is_discoverable == 1,
        show_exact_location: existing.show_exact_location == 1,
    };

    info!(
        owner_id = %owner_id,
        geohash = %record.geohash,
        discoverable = record.is_discoverable(),
        "📍 location updated"
    );
    Ok(record)
}

/// The owner's stored record, `None` while no coordinates are attached.
pub async fn get_location(pool: &SqlitePool, owner_id: &str) -> Result<Option<LocationRecord>> {
    let Some(row) = location_repo::load_profile_location(pool, owner_id).await? else {
        return Err(HeatmapError::ProfileNotFound(owner_id.to_string()));
    };
    Ok(row.into_record())
}

pub async fn update_privacy_settings(
    pool: &SqlitePool,
    owner_id: &str,
    update: &PrivacySettingsUpdate,
) -> Result<PrivacySettings> {
    let affected = location_repo::update_privacy_flags(
        pool,
        owner_id,
        update.is_discoverable,
        update.show_exact_location,
    )
    .await?;
    if affected == 0 {
        return Err(HeatmapError::ProfileNotFound(owner_id.to_string()));
    }

    let Some(row) = location_repo::load_profile_location(pool, owner_id).await? else {
        return Err(HeatmapError::ProfileNotFound(owner_id.to_string()));
    };
    let settings = PrivacySettings {
        is_discoverable: row.is_discoverable == 1,
        show_exact_location: row.show_exact_location == 1,
    };
    info!(
        owner_id = %owner_id,
        is_discoverable = settings.is_discoverable,
        show_exact_location = settings.show_exact_location,
        "privacy settings updated"
    );
    Ok(settings)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GeohashBackfillReport {
    pub candidates: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Re-derives stored geohashes from stored coordinates, walking every row in
/// owner order with `batch_size` rows per query. Rows that already agree are
/// skipped; rows with out-of-range coordinates are left untouched and counted
/// as failed.
pub async fn rehash_locations(pool: &SqlitePool, batch_size: i64) -> Result<GeohashBackfillReport> {
    let batch_size = batch_size.max(1);
    let mut report = GeohashBackfillReport::default();
    let mut cursor = String::new();

    loop {
        let batch = location_repo::list_geohash_candidates(pool, &cursor, batch_size).await?;
        let Some(last) = batch.last() else {
            break;
        };
        cursor = last.owner_id.clone();
        let exhausted = (batch.len() as i64) < batch_size;
        report.candidates += batch.len();

        for row in batch {
            let expected = match geohash::encode(row.latitude, row.longitude, MAX_PRECISION) {
                Ok(h) => h,
                Err(e) => {
                    warn!("📍 Cannot rehash location of {}: {}", row.owner_id, e);
                    report.failed += 1;
                    continue;
                }
            };

            if row.geohash.as_deref() == Some(expected.as_str()) {
                report.skipped += 1;
                continue;
            }

            let updated =
                location_repo::update_geohash(pool, &row.owner_id, expected.as_str()).await?;
            if updated > 0 {
                report.updated += 1;
            } else {
                report.failed += 1;
            }
        }

        debug!("📍 Geohash backfill batch done, cursor={}", cursor);
        if exhausted {
            break;
        }
    }

    info!(
        "📍 Geohash backfill done: candidates={}, updated={}, skipped={}, failed={}",
        report.candidates, report.updated, report.skipped, report.failed
    );

    Ok(report)
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

fn normalize_country_code(raw: Option<&str>) -> Result<Option<String>> {
    let Some(code) = clean(raw) else {
        return Ok(None);
    };
    if code.chars().count() > MAX_COUNTRY_CODE_LEN {
        return Err(HeatmapError::InvalidInput(format!(
            "country code '{}' longer than {} characters",
            code, MAX_COUNTRY_CODE_LEN
        )));
    }
    Ok(Some(code.to_uppercase()))
}

/// Display-only composite: "city, country", "country", or blank.
fn build_location_label(city: Option<&str>, country: Option<&str>) -> String {
    match (city, country) {
        (Some(city), Some(country)) => format!("{}, {}", city, country),
        (None, Some(country)) => country.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_label_variants() {
        assert_eq!(
            build_location_label(Some("Leiden"), Some("Netherlands")),
            "Leiden, Netherlands"
        );
        assert_eq!(build_location_label(None, Some("Netherlands")), "Netherlands");
        assert_eq!(build_location_label(Some("Leiden"), None), "");
        assert_eq!(build_location_label(None, None), "");
    }

    #[test]
    fn country_code_rules() {
        assert_eq!(normalize_country_code(Some(" nl ")).unwrap().as_deref(), Some("NL"));
        assert_eq!(normalize_country_code(Some("")).unwrap(), None);
        assert_eq!(normalize_country_code(None).unwrap(), None);
        assert!(matches!(
            normalize_country_code(Some("NLDX")),
            Err(HeatmapError::InvalidInput(_))
        ));
    }
}
