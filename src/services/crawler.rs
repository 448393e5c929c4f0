// SPDX-License-Identifier: MIT

//! Recent-activity crawl.
//!
//! Four sequential stages: discover the user's recent posts and comments,
//! select the most recently touched unique subreddits, expand each into
//! its newest posts, then descend into every post's comment thread. Each
//! stage's output selects the next stage's inputs, so stages never
//! overlap. Unlike profile aggregation, the crawl is tolerant: a failed
//! subreddit or post degrades to an empty entry and the crawl carries on;
//! `crawl` never returns an error.

use crate::models::{Comment, CommentSummary, Post, RecentActivityReport};
use crate::services::reddit::RedditApi;
use futures_util::{stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Recent posts and comments scanned to discover active subreddits.
pub const RECENT_ITEM_LIMIT: u32 = 50;

/// Unique subreddits expanded into their newest posts.
pub const RECENT_SUBREDDIT_CAP: usize = 5;

/// Newest posts fetched per expanded subreddit.
pub const SUBREDDIT_POST_LIMIT: u32 = 20;

/// Top-level comments fetched per post thread.
pub const THREAD_COMMENT_LIMIT: u32 = 20;

/// Listing fetches that may run at once during the expand and descend
/// stages. A single crawl can touch up to 100 posts, so this stays well
/// below Reddit's burst tolerance.
const CRAWL_FANOUT: usize = 4;

/// Deadline for the whole crawl. When it fires the crawl gives up and
/// reports nothing rather than erroring.
pub const CRAWL_DEADLINE: Duration = Duration::from_secs(120);

/// Author shown for comments whose author is gone.
const DELETED_AUTHOR: &str = "[deleted]";

/// Walks a user's recently active subreddits.
pub struct RecentActivityCrawler {
    api: Arc<dyn RedditApi>,
}

impl RecentActivityCrawler {
    pub fn new(api: Arc<dyn RedditApi>) -> Self {
        Self { api }
    }

    /// Crawl the user's recent activity. Never fails: upstream errors
    /// degrade the affected entries to empty lists, and the deadline
    /// degrades the whole report to empty.
    pub async fn crawl(&self, token: &str, username: &str) -> RecentActivityReport {
        match tokio::time::timeout(CRAWL_DEADLINE, self.crawl_inner(token, username)).await {
            Ok(report) => report,
            Err(_) => {
                tracing::warn!(username, "Recent-activity crawl timed out");
                RecentActivityReport::default()
            }
        }
    }

    async fn crawl_inner(&self, token: &str, username: &str) -> RecentActivityReport {
        // Stage 1: discover recent posts and comments concurrently.
        let (posts, comments) = tokio::join!(
            self.api.user_posts(token, username, RECENT_ITEM_LIMIT),
            self.api.user_comments(token, username, RECENT_ITEM_LIMIT),
        );

        let posts = posts.unwrap_or_else(|e| {
            tracing::warn!(username, error = %e, "Recent posts fetch failed");
            Vec::new()
        });
        let comments = comments.unwrap_or_else(|e| {
            tracing::warn!(username, error = %e, "Recent comments fetch failed");
            Vec::new()
        });

        // Stage 2: first-seen unique subreddits, posts before comments.
        let subreddits = select_recent_subreddits(&posts, &comments);
        tracing::info!(username, subreddits = ?subreddits, "Selected recent subreddits");

        // Stage 3: expand each subreddit into its newest posts. A failed
        // subreddit keeps its (empty) entry and never stops the others.
        let posts_by_subreddit: HashMap<String, Vec<Post>> =
            stream::iter(subreddits.iter().cloned())
                .map(|subreddit| async move {
                    let posts = match self
                        .api
                        .subreddit_new_posts(token, &subreddit, SUBREDDIT_POST_LIMIT)
                        .await
                    {
                        Ok(posts) => posts,
                        Err(e) => {
                            tracing::warn!(subreddit = %subreddit, error = %e, "Subreddit posts fetch failed");
                            Vec::new()
                        }
                    };
                    (subreddit, posts)
                })
                .buffered(CRAWL_FANOUT)
                .collect()
                .await;

        // Stage 4: descend into every collected post's comment thread,
        // with the same per-item isolation.
        let post_ids: Vec<String> = subreddits
            .iter()
            .filter_map(|s| posts_by_subreddit.get(s))
            .flatten()
            .map(|post| post.id.clone())
            .collect();

        let comments_by_post_id: HashMap<String, Vec<CommentSummary>> = stream::iter(post_ids)
            .map(|post_id| async move {
                let summaries = match self
                    .api
                    .post_comments(token, &post_id, THREAD_COMMENT_LIMIT)
                    .await
                {
                    Ok(raw) => raw.iter().map(summarize_comment).collect(),
                    Err(e) => {
                        tracing::warn!(post_id = %post_id, error = %e, "Comment thread fetch failed");
                        Vec::new()
                    }
                };
                (post_id, summaries)
            })
            .buffered(CRAWL_FANOUT)
            .collect()
            .await;

        RecentActivityReport {
            subreddits,
            posts_by_subreddit,
            comments_by_post_id,
        }
    }
}

/// Merge the subreddit names of recent posts and comments (in that
/// order), dropping duplicates while keeping first-seen order, capped at
/// [`RECENT_SUBREDDIT_CAP`].
fn select_recent_subreddits(posts: &[Post], comments: &[Comment]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    let names = posts
        .iter()
        .map(|p| &p.subreddit)
        .chain(comments.iter().map(|c| &c.subreddit));

    for name in names {
        if seen.insert(name.clone()) {
            selected.push(name.clone());
            if selected.len() == RECENT_SUBREDDIT_CAP {
                break;
            }
        }
    }

    selected
}

/// Strip a raw thread comment down to the fields the report keeps.
fn summarize_comment(raw: &serde_json::Value) -> CommentSummary {
    CommentSummary {
        id: raw
            .get("id")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string(),
        author: raw
            .get("author")
            .and_then(serde_json::Value::as_str)
            .filter(|a| !a.is_empty())
            .unwrap_or(DELETED_AUTHOR)
            .to_string(),
        body: raw
            .get("body")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("")
            .to_string(),
    }
}
