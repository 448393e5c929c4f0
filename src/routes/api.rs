// SPDX-License-Identifier: MIT

//! Read-back routes for stored documents.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/snapshot/{username}", get(get_snapshot))
}

/// Get the stored activity snapshot for a username.
async fn get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let snapshot = state
        .db
        .get_snapshot(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Snapshot for {}", username)))?;

    Ok(Json(snapshot))
}
