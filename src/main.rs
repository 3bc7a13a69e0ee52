use axum::{
    middleware,
    routing::{get, put},
    Json, Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use heatmap::database::schema;
use heatmap::web::middleware::auth as auth_middleware;
use heatmap::web::routes::{heatmap as heatmap_routes, location};

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        error!("heatmap server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db_url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set (e.g. in .env)")?;
    info!("Connecting to database: {}", db_url);

    let pool = SqlitePoolOptions::new().connect(&db_url).await?;
    schema::ensure_schema(&pool).await?;

    let protected_routes = Router::new()
        .route("/api/heatmap/clusters", get(heatmap_routes::clusters_handler))
        .route(
            "/api/heatmap/drilldown",
            get(heatmap_routes::drilldown_handler),
        )
        .route(
            "/api/profile/location",
            get(location::get_location_handler).put(location::update_location_handler),
        )
        .route(
            "/api/profile/location/privacy",
            put(location::update_privacy_handler),
        )
        .layer(middleware::from_fn(auth_middleware::require_caller));

    let app = Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .merge(protected_routes)
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(pool);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            let fallback: SocketAddr = format!("{}:{}", host, port.saturating_add(1)).parse()?;
            warn!(
                "Could not bind {}: {}. Trying fallback {}",
                addr, e, fallback
            );
            tokio::net::TcpListener::bind(fallback).await?
        }
    };

    info!(
        "🚀 Heatmap server on http://{} (build {})",
        listener.local_addr()?,
        env!("HEATMAP_BUILD_ID")
    );

    axum::serve(listener, app).await?;
    Ok(())
}
