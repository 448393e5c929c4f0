// SPDX-License-Identifier: MIT

//! Reddit-Recap API Server
//!
//! Connects Reddit accounts via OAuth, aggregates each user's activity
//! into a snapshot, crawls their recently active subreddits, and persists
//! the results to Firestore.

use reddit_recap::{config::Config, db::FirestoreDb, services::RedditClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Reddit-Recap API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize the Reddit API client
    let reddit = Arc::new(
        RedditClient::new(config.user_agent.clone()).expect("Failed to create Reddit client"),
    );
    tracing::info!(user_agent = %config.user_agent, "Reddit client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        reddit,
    });

    // Build router
    let app = reddit_recap::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reddit_recap=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
