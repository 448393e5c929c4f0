// SPDX-License-Identifier: MIT

//! Reddit-Recap: snapshot a Reddit account's activity
//!
//! This crate provides the backend API for connecting a Reddit account,
//! aggregating the user's activity into a snapshot, crawling recently
//! active subreddits, and persisting both to Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::FirestoreDb;
use services::reddit::RedditApi;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub reddit: Arc<dyn RedditApi>,
}
