//! User model for the authenticated Reddit account.

use serde::{Deserialize, Serialize};

/// Identity of the authenticated user, as returned by the `/api/v1/me`
/// endpoint. `name` is the canonical username that keys every per-user
/// fetch and the stored documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    #[serde(default)]
    pub is_gold: bool,
    #[serde(default)]
    pub is_mod: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub has_verified_email: bool,
}
