use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::geo::{Bounds, Geohash, LonRange};
use crate::models::{
    AlumniMarkerRow, GeohashCandidateRow, HeatmapFilters, LocationPointRow, ProfileLocationRow,
    Role,
};

/// Which records a heatmap query may see. Filters are expected normalized.
/// The major filter is not part of the SQL scope; see
/// `HeatmapFilters::matches_major`.
pub struct LocationScope<'a> {
    pub filters: &'a HeatmapFilters,
    pub bounds: Option<Bounds>,
    pub geohash_prefix: Option<&'a Geohash>,
    pub exclude_owner_id: Option<&'a str>,
}

const SQL_SCOPE_BASE: &str = r#"
FROM alumni_locations l
JOIN alumni_profiles p ON p.owner_id = l.owner_id
WHERE p.is_deleted = 0
  AND p.is_discoverable = 1
"#;

fn push_scope<'args>(qb: &mut QueryBuilder<'args, Sqlite>, scope: &LocationScope<'_>) {
    qb.push(SQL_SCOPE_BASE);
    qb.push(" AND p.role = ").push_bind(Role::RegularMember.as_str().to_string());

    let filters = scope.filters;
    if let Some(affiliation_id) = &filters.affiliation_id {
        qb.push(" AND p.affiliation_id = ")
            .push_bind(affiliation_id.clone());
    }
    if let Some(year) = filters.graduation_year {
        qb.push(" AND p.graduation_year = ").push_bind(year);
    }
    if let Some(code) = &filters.country_code {
        qb.push(" AND upper(COALESCE(l.country_code, '')) = ")
            .push_bind(code.to_uppercase());
    }

    if let Some(bounds) = scope.bounds {
        qb.push(" AND l.latitude BETWEEN ")
            .push_bind(bounds.south)
            .push(" AND ")
            .push_bind(bounds.north);
        match bounds.lon_range() {
            LonRange::Contiguous { west, east } => {
                qb.push(" AND l.longitude BETWEEN ")
                    .push_bind(west)
                    .push(" AND ")
                    .push_bind(east);
            }
            LonRange::Wrapped { west, east } => {
                qb.push(" AND (l.longitude >= ")
                    .push_bind(west)
                    .push(" OR l.longitude <= ")
                    .push_bind(east)
                    .push(")");
            }
        }
    }

    if let Some(prefix) = scope.geohash_prefix {
        qb.push(" AND l.geohash LIKE ")
            .push_bind(format!("{}%", prefix.as_str()));
    }

    if let Some(owner_id) = scope.exclude_owner_id {
        qb.push(" AND l.owner_id != ").push_bind(owner_id.to_string());
    }
}

pub async fn list_cluster_points(
    pool: &SqlitePool,
    scope: &LocationScope<'_>,
) -> sqlx::Result<Vec<LocationPointRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT l.owner_id, l.geohash, l.latitude, l.longitude, p.major, p.is_discoverable",
    );
    push_scope(&mut qb, scope);
    // Stable scan order keeps centroid sums bit-identical between calls.
    qb.push(" ORDER BY l.owner_id ASC");

    qb.build_query_as::<LocationPointRow>()
        .fetch_all(pool)
        .await
}

pub async fn count_markers(pool: &SqlitePool, scope: &LocationScope<'_>) -> sqlx::Result<i64> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*)");
    push_scope(&mut qb, scope);

    qb.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Markers in display order; `window` is `(limit, offset)`, `None` for all.
pub async fn list_markers(
    pool: &SqlitePool,
    scope: &LocationScope<'_>,
    window: Option<(i64, i64)>,
) -> sqlx::Result<Vec<AlumniMarkerRow>> {
    let mut qb = QueryBuilder::<Sqlite>::new(
        r#"SELECT
  p.owner_id,
  p.display_name,
  p.avatar_url,
  p.graduation_year,
  p.major,
  p.affiliation_name,
  p.job_title,
  p.company,
  l.city,
  l.country,
  l.latitude,
  l.longitude,
  p.is_discoverable,
  p.show_exact_location"#,
    );
    push_scope(&mut qb, scope);
    qb.push(" ORDER BY lower(COALESCE(p.display_name, '')) ASC, p.owner_id ASC");
    if let Some((limit, offset)) = window {
        qb.push(" LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);
    }

    qb.build_query_as::<AlumniMarkerRow>()
        .fetch_all(pool)
        .await
}

const SQL_LOAD_PROFILE_LOCATION: &str = r#"
SELECT
  p.owner_id,
  l.latitude,
  l.longitude,
  l.city,
  l.country,
  l.country_code,
  l.geohash,
  l.location,
  p.is_discoverable,
  p.show_exact_location
FROM alumni_profiles p
LEFT JOIN alumni_locations l ON l.owner_id = p.owner_id
WHERE p.owner_id = ?1
  AND p.is_deleted = 0
LIMIT 1
"#;

pub async fn load_profile_location(
    pool: &SqlitePool,
    owner_id: &str,
) -> sqlx::Result<Option<ProfileLocationRow>> {
    sqlx::query_as::<_, ProfileLocationRow>(SQL_LOAD_PROFILE_LOCATION)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
}

pub struct UpsertLocation<'a> {
    pub owner_id: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<&'a str>,
    pub country: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub geohash: &'a str,
    pub location: &'a str,
}

const SQL_UPSERT_LOCATION: &str = r#"
INSERT INTO alumni_locations (
  owner_id,
  latitude,
  longitude,
  city,
  country,
  country_code,
  geohash,
  location,
  updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
ON CONFLICT(owner_id) DO UPDATE SET
  latitude = excluded.latitude,
  longitude = excluded.longitude,
  city = excluded.city,
  country = excluded.country,
  country_code = excluded.country_code,
  geohash = excluded.geohash,
  location = excluded.location,
  updated_at = excluded.updated_at
"#;

pub async fn upsert_location(pool: &SqlitePool, loc: UpsertLocation<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_UPSERT_LOCATION)
        .bind(loc.owner_id)
        .bind(loc.latitude)
        .bind(loc.longitude)
        .bind(loc.city)
        .bind(loc.country)
        .bind(loc.country_code)
        .bind(loc.geohash)
        .bind(loc.location)
        .execute(pool)
        .await?;
    Ok(())
}

const SQL_UPDATE_PRIVACY_FLAGS: &str = r#"
UPDATE alumni_profiles
SET is_discoverable = COALESCE(?1, is_discoverable),
    show_exact_location = COALESCE(?2, show_exact_location)
WHERE owner_id = ?3
  AND is_deleted = 0
"#;

pub async fn update_privacy_flags(
    pool: &SqlitePool,
    owner_id: &str,
    is_discoverable: Option<bool>,
    show_exact_location: Option<bool>,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_PRIVACY_FLAGS)
        .bind(is_discoverable.map(i64::from))
        .bind(show_exact_location.map(i64::from))
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Keyset page: rows strictly after the cursor, so a scan walks the whole
// table one batch at a time.
const SQL_LIST_GEOHASH_CANDIDATES: &str = r#"
SELECT
  owner_id,
  latitude,
  longitude,
  geohash
FROM alumni_locations
WHERE owner_id > ?1
ORDER BY owner_id ASC
LIMIT ?2
"#;

pub async fn list_geohash_candidates(
    pool: &SqlitePool,
    after_owner_id: &str,
    limit: i64,
) -> sqlx::Result<Vec<GeohashCandidateRow>> {
    sqlx::query_as::<_, GeohashCandidateRow>(SQL_LIST_GEOHASH_CANDIDATES)
        .bind(after_owner_id)
        .bind(limit)
        .fetch_all(pool)
        .await
}

const SQL_UPDATE_GEOHASH: &str = r#"
UPDATE alumni_locations
SET geohash = ?, updated_at = datetime('now')
WHERE owner_id = ?
"#;

pub async fn update_geohash(pool: &SqlitePool, owner_id: &str, geohash: &str) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_GEOHASH)
        .bind(geohash)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
