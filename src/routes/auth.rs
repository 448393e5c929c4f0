// SPDX-License-Identifier: MIT

//! Reddit OAuth authentication routes.
//!
//! `/auth/reddit` redirects the user to Reddit's consent page with a
//! signed state parameter; the callback exchanges the code for a bearer
//! token, aggregates and stores the activity snapshot, and kicks off the
//! recent-activity crawl in the background.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::ActivitySnapshot;
use crate::services::{reddit, sanitize, ProfileAggregator, RecentActivityCrawler};
use crate::AppState;

/// Scopes the aggregation pipelines need.
const OAUTH_SCOPES: &str = "identity history read mysubreddits";

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/reddit", get(auth_start))
        .route("/auth/reddit/callback", get(auth_callback))
}

/// Start OAuth flow - redirect to Reddit authorization.
async fn auth_start(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let oauth_state = make_state(&state.config.oauth_state_key)?;

    let auth_url = format!(
        "{}?client_id={}&response_type=code&state={}&redirect_uri={}&duration=temporary&scope={}",
        reddit::AUTHORIZE_URL,
        state.config.reddit_client_id,
        oauth_state,
        urlencoding::encode(&state.config.redirect_uri),
        urlencoding::encode(OAUTH_SCOPES),
    );

    tracing::info!(
        client_id = %state.config.reddit_client_id,
        "Starting OAuth flow, redirecting to Reddit"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token, aggregate and store.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<ActivitySnapshot>> {
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Reddit");
        return Err(AppError::BadRequest(format!(
            "Authorization failed: {}",
            error
        )));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Authorization failed: no code provided".to_string()))?;

    if !verify_state(&params.state, &state.config.oauth_state_key) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return Err(AppError::Unauthorized);
    }

    tracing::info!("Exchanging authorization code for a token");
    let token = reddit::exchange_code(&state.config, &code).await?;

    let aggregator = ProfileAggregator::new(state.reddit.clone());
    let snapshot = aggregator.aggregate(&token).await?;
    let username = snapshot.user.name.clone();

    state.db.set_snapshot(&username, &snapshot).await?;
    tracing::info!(username = %username, "Activity snapshot stored");

    // The crawl runs after the response is sent; its report is sanitized
    // and stored in the background.
    let crawler = RecentActivityCrawler::new(state.reddit.clone());
    let db = state.db.clone();
    tokio::spawn(async move {
        let report = crawler.crawl(&token, &username).await;

        let document = match serde_json::to_value(&report) {
            Ok(value) => sanitize::sanitize_json(&value),
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Failed to serialize activity report");
                return;
            }
        };

        match db.set_activity_report(&username, &document).await {
            Ok(()) => tracing::info!(username = %username, "Recent-activity report stored"),
            Err(e) => {
                tracing::error!(username = %username, error = %e, "Failed to store activity report")
            }
        }
    });

    Ok(Json(snapshot))
}

/// Build the signed OAuth state parameter: "nonce|timestamp_hex|signature",
/// base64url encoded.
fn make_state(secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let nonce = Uuid::new_v4().simple().to_string();
    let payload = format!("{}|{:x}", nonce, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature)))
}

/// Verify the HMAC signature of an OAuth state parameter.
fn verify_state(state: &str, secret: &[u8]) -> bool {
    let Ok(bytes) = URL_SAFE_NO_PAD.decode(state) else {
        return false;
    };
    let Ok(state_str) = String::from_utf8(bytes) else {
        return false;
    };

    // Format is "nonce|timestamp_hex|signature_hex"
    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return false;
    }

    let payload = format!("{}|{}", parts[0], parts[1]);

    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    parts[2] == expected
}
