// SPDX-License-Identifier: MIT

//! Reddit API client.
//!
//! A thin authenticated wrapper over the OAuth API host. Every request
//! carries the bearer token and the User-Agent value the API requires;
//! callers control pagination through the `limit` parameter (listings are
//! reverse-chronological, most recent first, truncated at `limit`); no
//! automatic page walking happens here.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Comment, Post, RedditUser};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";

/// OAuth endpoints live on the www host, not the API host.
pub const AUTHORIZE_URL: &str = "https://www.reddit.com/api/v1/authorize";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch surface the aggregation pipelines depend on. Implemented by
/// [`RedditClient`]; tests substitute in-memory implementations.
#[async_trait]
pub trait RedditApi: Send + Sync {
    /// Identity of the token's owner (`/api/v1/me`).
    async fn user_info(&self, token: &str) -> Result<RedditUser, AppError>;

    /// Display names of the subreddits the user subscribes to.
    async fn subscribed_subreddits(&self, token: &str, limit: u32)
        -> Result<Vec<String>, AppError>;

    /// The user's most recent submitted posts.
    async fn user_posts(&self, token: &str, username: &str, limit: u32)
        -> Result<Vec<Post>, AppError>;

    /// The user's most recent comments.
    async fn user_comments(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, AppError>;

    /// Look up any thing by fullname. `None` when it was deleted or never
    /// existed; absence is a valid outcome, not a failure.
    async fn thing_by_id(&self, token: &str, thing_id: &str)
        -> Result<Option<ThingData>, AppError>;

    /// Public metadata of a subreddit (`/r/{name}/about`).
    async fn subreddit_about(
        &self,
        token: &str,
        subreddit: &str,
    ) -> Result<SubredditAbout, AppError>;

    /// Per-subreddit karma breakdown, passed through unparsed.
    async fn karma_breakdown(&self, token: &str) -> Result<serde_json::Value, AppError>;

    /// Posts the user upvoted.
    async fn upvoted_posts(&self, token: &str, username: &str, limit: u32)
        -> Result<Vec<Post>, AppError>;

    /// Posts the user downvoted.
    async fn downvoted_posts(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError>;

    /// Newest posts of a subreddit (`/r/{name}/new`).
    async fn subreddit_new_posts(
        &self,
        token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError>;

    /// Raw top-level comment payloads of a post's thread.
    async fn post_comments(
        &self,
        token: &str,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, AppError>;
}

// ─── Wire types ──────────────────────────────────────────────

/// Listing envelope common to all Reddit list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<ListingChild<T>>,
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// Payload of an `/api/info` lookup. Posts carry `title`, comments carry
/// `body`; `name` is the fullname whose prefix encodes the kind.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThingData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub permalink: String,
}

/// Payload of `/r/{name}/about`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubredditAbout {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub icon_img: Option<String>,
    #[serde(default)]
    pub community_icon: Option<String>,
    #[serde(default)]
    pub subscribers: Option<u64>,
    #[serde(default)]
    pub public_description: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────

/// Authenticated client for the Reddit OAuth API.
pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl RedditClient {
    /// Create a client. `user_agent` is the client identifier Reddit
    /// requires on every request; requests without one get throttled
    /// aggressively.
    pub fn new(user_agent: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: REDDIT_API_BASE.to_string(),
            user_agent,
        })
    }

    /// Authenticated GET with JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(path, error = %e, "Reddit request failed");
                AppError::upstream_transport(&e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!(path, "Reddit rate limit hit (429)");
            }

            return Err(AppError::RedditApi {
                status: Some(status.as_u16()),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        response.json().await.map_err(|e| AppError::RedditApi {
            status: None,
            message: format!("JSON parse error: {}", e),
        })
    }
}

#[async_trait]
impl RedditApi for RedditClient {
    async fn user_info(&self, token: &str) -> Result<RedditUser, AppError> {
        let user: RedditUser = self.get_json("/api/v1/me", token, &[]).await?;
        tracing::debug!(username = %user.name, "Retrieved user info");
        Ok(user)
    }

    async fn subscribed_subreddits(
        &self,
        token: &str,
        limit: u32,
    ) -> Result<Vec<String>, AppError> {
        let listing: Listing<SubredditAbout> = self
            .get_json(
                "/subreddits/mine/subscriber",
                token,
                &[("limit", limit.to_string())],
            )
            .await?;

        let names: Vec<String> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.display_name)
            .collect();

        tracing::debug!(count = names.len(), "Retrieved subscribed subreddits");
        Ok(names)
    }

    async fn user_posts(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        let path = format!("/user/{}/submitted", username);
        let listing: Listing<Post> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    async fn user_comments(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, AppError> {
        let path = format!("/user/{}/comments", username);
        let listing: Listing<Comment> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    async fn thing_by_id(
        &self,
        token: &str,
        thing_id: &str,
    ) -> Result<Option<ThingData>, AppError> {
        let listing: Listing<ThingData> = self
            .get_json("/api/info", token, &[("id", thing_id.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().next().map(|c| c.data))
    }

    async fn subreddit_about(
        &self,
        token: &str,
        subreddit: &str,
    ) -> Result<SubredditAbout, AppError> {
        let path = format!("/r/{}/about", subreddit);
        let about: ListingChild<SubredditAbout> = self.get_json(&path, token, &[]).await?;
        Ok(about.data)
    }

    async fn karma_breakdown(&self, token: &str) -> Result<serde_json::Value, AppError> {
        self.get_json("/api/v1/me/karma", token, &[]).await
    }

    async fn upvoted_posts(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        let path = format!("/user/{}/upvoted", username);
        let listing: Listing<Post> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    async fn downvoted_posts(
        &self,
        token: &str,
        username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        let path = format!("/user/{}/downvoted", username);
        let listing: Listing<Post> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    async fn subreddit_new_posts(
        &self,
        token: &str,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        let path = format!("/r/{}/new", subreddit);
        let listing: Listing<Post> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        Ok(listing.data.children.into_iter().map(|c| c.data).collect())
    }

    async fn post_comments(
        &self,
        token: &str,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        // The comments endpoint returns a two-element array: the post's own
        // listing, then the comment tree listing.
        let path = format!("/comments/{}", post_id);
        let listings: Vec<Listing<serde_json::Value>> = self
            .get_json(&path, token, &[("limit", limit.to_string())])
            .await?;

        let Some(comment_listing) = listings.into_iter().nth(1) else {
            tracing::debug!(post_id, "Comment thread response had no comment listing");
            return Ok(Vec::new());
        };

        Ok(comment_listing
            .data
            .children
            .into_iter()
            .map(|c| c.data)
            .collect())
    }
}

// ─── OAuth token exchange ────────────────────────────────────

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange an authorization code for a bearer token.
///
/// A single request/response against the token endpoint; the returned
/// token is an opaque credential owned by the caller.
pub async fn exchange_code(config: &Config, code: &str) -> Result<String, AppError> {
    let http = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create HTTP client: {}", e)))?;

    let response = http
        .post(TOKEN_URL)
        .basic_auth(&config.reddit_client_id, Some(&config.reddit_client_secret))
        .header(reqwest::header::USER_AGENT, &config.user_agent)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| AppError::RedditApi {
            status: None,
            message: format!("Token exchange failed: {}", e),
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "Reddit token exchange failed");
        return Err(AppError::RedditApi {
            status: Some(status.as_u16()),
            message: format!("Token exchange failed with status {}", status),
        });
    }

    let token: TokenResponse = response.json().await.map_err(|e| AppError::RedditApi {
        status: None,
        message: format!("Failed to parse token response: {}", e),
    })?;

    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = RedditClient::new("reddit-recap/0.1 by tester".to_string()).unwrap();
        assert_eq!(client.user_agent, "reddit-recap/0.1 by tester");
        assert_eq!(client.base_url, REDDIT_API_BASE);
    }

    #[test]
    fn test_listing_parses_reddit_shape() {
        let raw = serde_json::json!({
            "kind": "Listing",
            "data": {
                "children": [
                    { "kind": "t5", "data": { "display_name": "rust" } },
                    { "kind": "t5", "data": { "display_name": "programming" } }
                ],
                "after": "t5_abc"
            }
        });

        let listing: Listing<SubredditAbout> = serde_json::from_value(raw).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        assert_eq!(listing.data.children[0].data.display_name, "rust");
        assert_eq!(listing.data.after.as_deref(), Some("t5_abc"));
    }

    #[test]
    fn test_thing_data_tolerates_sparse_payloads() {
        let raw = serde_json::json!({ "id": "abc", "name": "t1_abc" });
        let thing: ThingData = serde_json::from_value(raw).unwrap();
        assert_eq!(thing.name, "t1_abc");
        assert!(thing.title.is_none());
        assert!(thing.body.is_none());
    }
}
