// SPDX-License-Identifier: MIT

//! Subreddit profile enrichment.
//!
//! Turns a list of subreddit names into display profiles by fetching each
//! one's about page. A failed fetch degrades that entry to a placeholder
//! instead of failing the batch: the output always has one entry per
//! input name (up to the cap), in input order.

use crate::models::{SubredditProfile, SubscriberCount};
use crate::services::reddit::{RedditApi, SubredditAbout};
use futures_util::{stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// At most this many about pages are fetched per snapshot, however many
/// subreddits the user subscribes to. Bounds upstream request volume.
pub const SUBREDDIT_PROFILE_CAP: usize = 10;

/// About fetches that may run at once.
const PROFILE_FANOUT: usize = 4;

/// Pick the subreddit's icon URL, preferring the explicit icon over the
/// community fallback image. Query parameters are dropped; anything that
/// is not an absolute URL becomes empty.
fn clean_icon(about: &SubredditAbout) -> String {
    let icon = about
        .icon_img
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| about.community_icon.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or("");

    if icon.starts_with("http") {
        icon.split('?').next().unwrap_or("").to_string()
    } else {
        String::new()
    }
}

/// Fetches public metadata for a bounded list of subreddits.
pub struct SubredditProfileFetcher {
    api: Arc<dyn RedditApi>,
}

impl SubredditProfileFetcher {
    pub fn new(api: Arc<dyn RedditApi>) -> Self {
        Self { api }
    }

    /// Fetch profiles for the first [`SUBREDDIT_PROFILE_CAP`] names.
    /// Never fails as a whole; entries whose fetch failed come back as
    /// [`SubredditProfile::unavailable`].
    pub async fn fetch_profiles(&self, token: &str, names: &[String]) -> Vec<SubredditProfile> {
        stream::iter(names.iter().take(SUBREDDIT_PROFILE_CAP))
            .map(|name| {
                // Coerce to an explicitly-`Send` trait object so `buffered`'s
                // future does not trip the higher-ranked `Send` rustc bug.
                let fut: Pin<Box<dyn Future<Output = SubredditProfile> + Send + '_>> =
                    Box::pin(self.fetch_one(token, name));
                fut
            })
            .buffered(PROFILE_FANOUT)
            .collect()
            .await
    }

    /// Fetch and shape a single subreddit's profile. Extracted into its own
    /// `async fn` so the per-item future carries correct higher-ranked
    /// lifetimes inside `buffered` (inline async blocks trip a rustc bug).
    async fn fetch_one(&self, token: &str, name: &str) -> SubredditProfile {
        match self.api.subreddit_about(token, name).await {
            Ok(about) => SubredditProfile {
                name: name.to_string(),
                icon: clean_icon(&about),
                subscribers: about
                    .subscribers
                    .map(SubscriberCount::Known)
                    .unwrap_or(SubscriberCount::Unknown),
                description: about.public_description.unwrap_or_default(),
            },
            Err(e) => {
                tracing::warn!(subreddit = %name, error = %e, "Subreddit about fetch failed");
                SubredditProfile::unavailable(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn about(icon_img: Option<&str>, community_icon: Option<&str>) -> SubredditAbout {
        SubredditAbout {
            icon_img: icon_img.map(String::from),
            community_icon: community_icon.map(String::from),
            ..SubredditAbout::default()
        }
    }

    #[test]
    fn test_clean_icon_prefers_icon_img() {
        let a = about(
            Some("https://a.example/icon.png?width=256"),
            Some("https://b.example/community.png"),
        );
        assert_eq!(clean_icon(&a), "https://a.example/icon.png");
    }

    #[test]
    fn test_clean_icon_falls_back_to_community_icon() {
        let a = about(None, Some("https://b.example/community.png?v=2"));
        assert_eq!(clean_icon(&a), "https://b.example/community.png");

        // An empty explicit icon counts as absent.
        let a = about(Some(""), Some("https://b.example/community.png"));
        assert_eq!(clean_icon(&a), "https://b.example/community.png");
    }

    #[test]
    fn test_clean_icon_rejects_relative_urls() {
        let a = about(Some("/img/icon.png"), None);
        assert_eq!(clean_icon(&a), "");
    }

    #[test]
    fn test_clean_icon_empty_when_absent() {
        let a = about(None, None);
        assert_eq!(clean_icon(&a), "");
    }
}
