// SPDX-License-Identifier: MIT

//! Comment parent resolution.
//!
//! Reddit comments reference their parent by fullname; the prefix encodes
//! whether the parent is a post (`t3_`) or another comment. Parents are
//! looked up through the generic info endpoint and attached to each
//! comment; a deleted or missing parent resolves to `None`.

use crate::error::AppError;
use crate::models::{CommentWithParent, ParentKind, ParentSummary};
use crate::services::reddit::RedditApi;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Fullname prefix that marks a post.
const POST_PREFIX: &str = "t3_";

/// Parent lookups for one batch of comments that may run at once. Bounds
/// the burst of info requests a single aggregation fires upstream.
const PARENT_FANOUT: usize = 8;

/// Classify a fullname by its prefix.
fn parent_kind(fullname: &str) -> ParentKind {
    if fullname.starts_with(POST_PREFIX) {
        ParentKind::Post
    } else {
        ParentKind::Comment
    }
}

/// Resolves comment parents through the generic lookup endpoint.
pub struct ParentResolver {
    api: Arc<dyn RedditApi>,
}

impl ParentResolver {
    pub fn new(api: Arc<dyn RedditApi>) -> Self {
        Self { api }
    }

    /// Resolve a parent reference. `Ok(None)` means the referenced thing
    /// no longer exists; lookup failures propagate to the caller.
    pub async fn resolve(
        &self,
        token: &str,
        parent_id: &str,
    ) -> Result<Option<ParentSummary>, AppError> {
        let Some(thing) = self.api.thing_by_id(token, parent_id).await? else {
            tracing::debug!(parent_id, "Parent thing not found");
            return Ok(None);
        };

        Ok(Some(ParentSummary {
            id: thing.id,
            kind: parent_kind(&thing.name),
            subreddit: thing.subreddit,
            title: thing.title,
            body: thing.body,
            permalink: thing.permalink,
        }))
    }

    /// Fetch the user's most recent comments and attach each one's
    /// resolved parent. Resolutions run concurrently (bounded); the output
    /// preserves comment order.
    pub async fn comments_with_parents(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<CommentWithParent>, AppError> {
        let comments = self.api.user_comments(token, username, limit).await?;

        stream::iter(comments)
            .map(|comment| async move {
                let parent = match comment.parent_id.clone() {
                    Some(parent_id) => self.resolve(token, &parent_id).await?,
                    None => None,
                };
                Ok::<_, AppError>(CommentWithParent { comment, parent })
            })
            .buffered(PARENT_FANOUT)
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_kind_classification() {
        assert_eq!(parent_kind("t3_abc123"), ParentKind::Post);
        assert_eq!(parent_kind("t1_abc123"), ParentKind::Comment);
        assert_eq!(parent_kind("t4_abc123"), ParentKind::Comment);
        assert_eq!(parent_kind(""), ParentKind::Comment);
    }
}
