// SPDX-License-Identifier: MIT

//! Full-profile aggregation.
//!
//! Resolves the account identity, then fans out across the independent
//! resource branches (subscriptions, posts, comments-with-parents, karma,
//! upvoted, downvoted) concurrently and joins them into one snapshot.
//! Aggregation is all-or-nothing: the first branch failure aborts the
//! whole snapshot. A partially populated snapshot is never produced.

use crate::error::AppError;
use crate::models::ActivitySnapshot;
use crate::services::parents::ParentResolver;
use crate::services::reddit::RedditApi;
use crate::services::subreddits::SubredditProfileFetcher;
use std::sync::Arc;
use std::time::Duration;

/// Items fetched per listing branch of the snapshot.
pub const PROFILE_ITEM_LIMIT: u32 = 10;

/// One page of subscribed subreddits.
pub const SUBSCRIPTION_PAGE_LIMIT: u32 = 100;

/// Deadline for the whole aggregation, covering every branch request.
pub const AGGREGATE_DEADLINE: Duration = Duration::from_secs(60);

/// Builds [`ActivitySnapshot`]s with strict all-or-nothing semantics.
pub struct ProfileAggregator {
    api: Arc<dyn RedditApi>,
    parents: ParentResolver,
    subreddits: SubredditProfileFetcher,
}

impl ProfileAggregator {
    pub fn new(api: Arc<dyn RedditApi>) -> Self {
        Self {
            parents: ParentResolver::new(api.clone()),
            subreddits: SubredditProfileFetcher::new(api.clone()),
            api,
        }
    }

    /// Aggregate the token owner's activity into a snapshot.
    ///
    /// Fails if the identity lookup or any of the six branches fails, with
    /// the branch's upstream error propagated unmodified. The whole call
    /// runs under [`AGGREGATE_DEADLINE`]; when it fires, all in-flight
    /// branch requests are dropped.
    pub async fn aggregate(&self, token: &str) -> Result<ActivitySnapshot, AppError> {
        match tokio::time::timeout(AGGREGATE_DEADLINE, self.aggregate_inner(token)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Profile aggregation timed out");
                Err(AppError::Timeout(AGGREGATE_DEADLINE))
            }
        }
    }

    async fn aggregate_inner(&self, token: &str) -> Result<ActivitySnapshot, AppError> {
        // The username keys every per-user branch, so identity resolves
        // before anything else starts.
        let user = self.api.user_info(token).await?;
        let username = user.name.clone();

        tracing::info!(username = %username, "Aggregating activity snapshot");

        let (subscriptions, posts, comments, karma, upvoted, downvoted) = tokio::try_join!(
            // Profile enrichment depends on the subscription names, so it
            // chains onto that branch and starts as soon as they resolve.
            async {
                let names = self
                    .api
                    .subscribed_subreddits(token, SUBSCRIPTION_PAGE_LIMIT)
                    .await?;
                Ok::<_, AppError>(self.subreddits.fetch_profiles(token, &names).await)
            },
            self.api.user_posts(token, &username, PROFILE_ITEM_LIMIT),
            self.parents
                .comments_with_parents(token, &username, PROFILE_ITEM_LIMIT),
            self.api.karma_breakdown(token),
            self.api.upvoted_posts(token, &username, PROFILE_ITEM_LIMIT),
            self.api.downvoted_posts(token, &username, PROFILE_ITEM_LIMIT),
        )?;

        tracing::info!(
            username = %username,
            subscriptions = subscriptions.len(),
            posts = posts.len(),
            comments = comments.len(),
            "Activity snapshot aggregated"
        );

        Ok(ActivitySnapshot {
            user,
            subscriptions,
            posts,
            comments,
            upvoted,
            downvoted,
            karma,
        })
    }
}
