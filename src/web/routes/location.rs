use axum::{extract::State, Extension, Json};
use sqlx::SqlitePool;

use crate::error::HeatmapError;
use crate::models::{CallerContext, LocationRecord};
use crate::services::location_update_service::{
    self, LocationUpdate, PrivacySettings, PrivacySettingsUpdate,
};

pub async fn get_location_handler(
    Extension(caller): Extension<CallerContext>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Option<LocationRecord>>, HeatmapError> {
    location_update_service::get_location(&pool, &caller.owner_id)
        .await
        .map(Json)
}

pub async fn update_location_handler(
    Extension(caller): Extension<CallerContext>,
    State(pool): State<SqlitePool>,
    Json(body): Json<LocationUpdate>,
) -> Result<Json<LocationRecord>, HeatmapError> {
    location_update_service::update_location(&pool, &caller.owner_id, &body)
        .await
        .map(Json)
}

pub async fn update_privacy_handler(
    Extension(caller): Extension<CallerContext>,
    State(pool): State<SqlitePool>,
    Json(body): Json<PrivacySettingsUpdate>,
) -> Result<Json<PrivacySettings>, HeatmapError> {
    location_update_service::update_privacy_settings(&pool, &caller.owner_id, &body)
        .await
        .map(Json)
}
