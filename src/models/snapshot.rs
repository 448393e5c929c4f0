//! Aggregate documents persisted to Firestore.

use crate::models::{CommentWithParent, Post, RedditUser, SubredditProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full activity snapshot of a user. All branches must be present; a
/// partially aggregated snapshot is never materialized. Field names follow
/// the stored document schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    #[serde(rename = "info")]
    pub user: RedditUser,
    pub subscriptions: Vec<SubredditProfile>,
    pub posts: Vec<Post>,
    pub comments: Vec<CommentWithParent>,
    #[serde(rename = "upvotedPosts")]
    pub upvoted: Vec<Post>,
    #[serde(rename = "downvotedPosts")]
    pub downvoted: Vec<Post>,
    /// Per-subreddit karma breakdown, passed through as returned upstream.
    #[serde(rename = "karmaBreakdown")]
    pub karma: serde_json::Value,
}

/// Stripped-down comment entry in the recent-activity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSummary {
    pub id: String,
    pub author: String,
    pub body: String,
}

/// Recently touched subreddits with their newest posts and each post's
/// top-level comments. Entries for subreddits or posts whose fetch failed
/// are present but empty; the report itself always materializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityReport {
    /// Unique subreddit names in first-seen order across the user's
    /// recent posts and comments.
    pub subreddits: Vec<String>,
    pub posts_by_subreddit: HashMap<String, Vec<Post>>,
    pub comments_by_post_id: HashMap<String, Vec<CommentSummary>>,
}
