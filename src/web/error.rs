use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::HeatmapError;

impl HeatmapError {
    pub fn status(&self) -> StatusCode {
        match self {
            HeatmapError::InvalidCoordinate { .. }
            | HeatmapError::InvalidBounds(_)
            | HeatmapError::InvalidGeohash(_)
            | HeatmapError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            HeatmapError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
            HeatmapError::ForbiddenRole(_) => StatusCode::FORBIDDEN,
            HeatmapError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HeatmapError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            HeatmapError::Database(e) => {
                tracing::error!(error = %e, "heatmap_store_failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (
            status,
            Json(serde_json::json!({ "error": self.code(), "message": message })),
        )
            .into_response()
    }
}
