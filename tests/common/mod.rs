// SPDX-License-Identifier: MIT

//! Shared test doubles for the fetch pipelines.

#![allow(dead_code)]

use async_trait::async_trait;
use reddit_recap::error::AppError;
use reddit_recap::models::{Comment, Post, RedditUser};
use reddit_recap::services::reddit::{RedditApi, SubredditAbout, ThingData};
use std::collections::{HashMap, HashSet};

/// In-memory Reddit API double. Endpoints serve the configured fixtures;
/// keys added via [`StubApi::fail_on`] make the matching call fail with
/// an upstream error. Keys: `user_info`, `subscriptions`, `user_posts`,
/// `user_comments`, `karma`, `upvoted`, `downvoted`, `thing:<fullname>`,
/// `about:<subreddit>`, `new:<subreddit>`, `thread:<post_id>`.
#[derive(Default)]
pub struct StubApi {
    pub user: Option<RedditUser>,
    pub subscriptions: Vec<String>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub things: HashMap<String, ThingData>,
    pub abouts: HashMap<String, SubredditAbout>,
    pub karma: serde_json::Value,
    pub upvoted: Vec<Post>,
    pub downvoted: Vec<Post>,
    pub new_posts: HashMap<String, Vec<Post>>,
    pub thread_comments: HashMap<String, Vec<serde_json::Value>>,
    pub fail: HashSet<String>,
}

impl StubApi {
    pub fn for_user(name: &str) -> Self {
        Self {
            user: Some(test_user(name)),
            ..Self::default()
        }
    }

    pub fn fail_on(mut self, key: &str) -> Self {
        self.fail.insert(key.to_string());
        self
    }

    fn check(&self, key: &str) -> Result<(), AppError> {
        if self.fail.contains(key) {
            Err(AppError::RedditApi {
                status: Some(500),
                message: format!("stub failure: {}", key),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RedditApi for StubApi {
    async fn user_info(&self, _token: &str) -> Result<RedditUser, AppError> {
        self.check("user_info")?;
        self.user.clone().ok_or(AppError::RedditApi {
            status: Some(404),
            message: "no stub user".to_string(),
        })
    }

    async fn subscribed_subreddits(
        &self,
        _token: &str,
        _limit: u32,
    ) -> Result<Vec<String>, AppError> {
        self.check("subscriptions")?;
        Ok(self.subscriptions.clone())
    }

    async fn user_posts(
        &self,
        _token: &str,
        _username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        self.check("user_posts")?;
        Ok(self.posts.iter().take(limit as usize).cloned().collect())
    }

    async fn user_comments(
        &self,
        _token: &str,
        _username: &str,
        limit: u32,
    ) -> Result<Vec<Comment>, AppError> {
        self.check("user_comments")?;
        Ok(self.comments.iter().take(limit as usize).cloned().collect())
    }

    async fn thing_by_id(
        &self,
        _token: &str,
        thing_id: &str,
    ) -> Result<Option<ThingData>, AppError> {
        self.check(&format!("thing:{}", thing_id))?;
        Ok(self.things.get(thing_id).cloned())
    }

    async fn subreddit_about(
        &self,
        _token: &str,
        subreddit: &str,
    ) -> Result<SubredditAbout, AppError> {
        self.check(&format!("about:{}", subreddit))?;
        Ok(self.abouts.get(subreddit).cloned().unwrap_or_default())
    }

    async fn karma_breakdown(&self, _token: &str) -> Result<serde_json::Value, AppError> {
        self.check("karma")?;
        Ok(self.karma.clone())
    }

    async fn upvoted_posts(
        &self,
        _token: &str,
        _username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        self.check("upvoted")?;
        Ok(self.upvoted.iter().take(limit as usize).cloned().collect())
    }

    async fn downvoted_posts(
        &self,
        _token: &str,
        _username: &str,
        limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        self.check("downvoted")?;
        Ok(self.downvoted.iter().take(limit as usize).cloned().collect())
    }

    async fn subreddit_new_posts(
        &self,
        _token: &str,
        subreddit: &str,
        _limit: u32,
    ) -> Result<Vec<Post>, AppError> {
        self.check(&format!("new:{}", subreddit))?;
        Ok(self.new_posts.get(subreddit).cloned().unwrap_or_default())
    }

    async fn post_comments(
        &self,
        _token: &str,
        post_id: &str,
        _limit: u32,
    ) -> Result<Vec<serde_json::Value>, AppError> {
        self.check(&format!("thread:{}", post_id))?;
        Ok(self
            .thread_comments
            .get(post_id)
            .cloned()
            .unwrap_or_default())
    }
}

// ─── Fixture helpers ─────────────────────────────────────────

pub fn test_user(name: &str) -> RedditUser {
    RedditUser {
        id: format!("id_{}", name),
        name: name.to_string(),
        created_utc: 1_600_000_000.0,
        link_karma: 100,
        comment_karma: 250,
        is_gold: false,
        is_mod: false,
        verified: true,
        has_verified_email: true,
    }
}

pub fn post(id: &str, subreddit: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("title of {}", id),
        url: format!("https://reddit.com/r/{}/comments/{}", subreddit, id),
        subreddit: subreddit.to_string(),
        link_flair_text: None,
        created_utc: 1_700_000_000.0,
        selftext: String::new(),
        ups: 10,
        downs: 1,
        permalink: format!("/r/{}/comments/{}", subreddit, id),
    }
}

pub fn comment(id: &str, subreddit: &str, parent_id: Option<&str>) -> Comment {
    Comment {
        id: id.to_string(),
        body: format!("body of {}", id),
        subreddit: subreddit.to_string(),
        ups: 5,
        downs: 0,
        parent_id: parent_id.map(String::from),
        link_id: None,
        permalink: format!("/r/{}/comments/{}", subreddit, id),
        created_utc: 1_700_000_000.0,
    }
}

pub fn about(display_name: &str, subscribers: u64, icon: &str, description: &str) -> SubredditAbout {
    SubredditAbout {
        display_name: display_name.to_string(),
        icon_img: Some(icon.to_string()),
        community_icon: None,
        subscribers: Some(subscribers),
        public_description: Some(description.to_string()),
    }
}

pub fn post_thing(fullname: &str, subreddit: &str, title: &str) -> ThingData {
    ThingData {
        id: fullname.trim_start_matches("t3_").to_string(),
        name: fullname.to_string(),
        subreddit: subreddit.to_string(),
        title: Some(title.to_string()),
        body: None,
        permalink: format!("/r/{}/comments/{}", subreddit, fullname),
    }
}

pub fn comment_thing(fullname: &str, subreddit: &str, body: &str) -> ThingData {
    ThingData {
        id: fullname.trim_start_matches("t1_").to_string(),
        name: fullname.to_string(),
        subreddit: subreddit.to_string(),
        title: None,
        body: Some(body.to_string()),
        permalink: format!("/r/{}/comments/{}", subreddit, fullname),
    }
}
