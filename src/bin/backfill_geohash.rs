use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use heatmap::database::schema;
use heatmap::services::location_update_service;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let Ok(db_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL must be set (e.g. in .env)");
        std::process::exit(2);
    };
    let pool = match SqlitePoolOptions::new().connect(&db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot connect to {}: {}", db_url, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = schema::ensure_schema(&pool).await {
        eprintln!("schema bootstrap failed: {}", e);
        std::process::exit(1);
    }

    // Rows per batch; the whole table is always walked.
    let batch_size: i64 = env::var("BACKFILL_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(500);

    match location_update_service::rehash_locations(&pool, batch_size).await {
        Ok(report) => {
            println!(
                "geohash backfill: candidates={}, updated={}, skipped={}, failed={}",
                report.candidates, report.updated, report.skipped, report.failed
            );
        }
        Err(e) => {
            eprintln!("geohash backfill failed: {}", e);
            std::process::exit(1);
        }
    }
}
