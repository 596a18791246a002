//! Tag endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /api/tags - every known tag name
async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, ApiError> {
    let tags = state.store.list_tags().await?;
    Ok(Json(tags))
}

/// Tag routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/tags", get(list_tags))
}
