//! Post and comment models.
//!
//! These are projections of Reddit listing payloads. Listing items are
//! sparse (deleted or removed content drops fields), so everything but the
//! id tolerates absence.

use serde::{Deserialize, Serialize};

/// A submitted post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub link_flair_text: Option<String>,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    #[serde(default)]
    pub permalink: String,
}

/// A comment written by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    /// Fullname of the thing this comment replies to (`t3_…` for a post,
    /// `t1_…` for another comment).
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub link_id: Option<String>,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub created_utc: f64,
}

/// Kind of a resolved comment parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentKind {
    Post,
    Comment,
}

/// Resolved parent of a comment. `title` is set for post parents, `body`
/// for comment parents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ParentKind,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub permalink: String,
}

/// A comment together with its resolved parent. `parent` is `None` when
/// the comment has no parent reference or the parent no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentWithParent {
    #[serde(flatten)]
    pub comment: Comment,
    pub parent: Option<ParentSummary>,
}
