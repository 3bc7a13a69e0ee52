use sqlx::SqlitePool;

// Profiles are owned by the profile system; this crate reads them and only
// writes the two privacy flags.
const SQL_CREATE_PROFILES: &str = r#"
CREATE TABLE IF NOT EXISTS alumni_profiles (
  owner_id TEXT PRIMARY KEY NOT NULL,
  display_name TEXT,
  avatar_url TEXT,
  graduation_year INTEGER,
  major TEXT,
  affiliation_id TEXT,
  affiliation_name TEXT,
  job_title TEXT,
  company TEXT,
  role TEXT NOT NULL DEFAULT 'REGULAR_MEMBER',
  is_discoverable INTEGER NOT NULL DEFAULT 0,
  show_exact_location INTEGER NOT NULL DEFAULT 0,
  is_deleted INTEGER NOT NULL DEFAULT 0
)
"#;

const SQL_CREATE_LOCATIONS: &str = r#"
CREATE TABLE IF NOT EXISTS alumni_locations (
  owner_id TEXT PRIMARY KEY NOT NULL REFERENCES alumni_profiles(owner_id),
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  city TEXT,
  country TEXT,
  country_code TEXT,
  geohash TEXT NOT NULL,
  location TEXT NOT NULL DEFAULT '',
  updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
"#;

const SQL_CREATE_GEOHASH_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_alumni_locations_geohash
  ON alumni_locations (geohash)
"#;

const SQL_CREATE_AFFILIATION_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_alumni_profiles_affiliation
  ON alumni_profiles (affiliation_id)
"#;

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for stmt in [
        SQL_CREATE_PROFILES,
        SQL_CREATE_LOCATIONS,
        SQL_CREATE_GEOHASH_INDEX,
        SQL_CREATE_AFFILIATION_INDEX,
    ] {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}
