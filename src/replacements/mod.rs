use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::AppState;

/// GET /get_replacements
/// The replacement feed consumed by the dashboard renderer: one record per
/// assignment, names resolved, in insertion order
pub async fn get_replacements(State(state): State<AppState>) -> impl IntoResponse {
    match state.replacement_repo.list_records().await {
        Ok(records) => Ok(Json(records)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "database_error",
                "message": e.to_string()
            })),
        )),
    }
}
