// SPDX-License-Identifier: MIT

//! Parent resolution: prefix classification and absence handling.

mod common;

use common::{comment, comment_thing, post_thing, StubApi};
use reddit_recap::models::ParentKind;
use reddit_recap::services::ParentResolver;
use std::sync::Arc;

#[tokio::test]
async fn a_t3_parent_is_a_post() {
    let mut stub = StubApi::for_user("alice");
    stub.things.insert(
        "t3_abc".to_string(),
        post_thing("t3_abc", "rust", "Some post"),
    );

    let resolver = ParentResolver::new(Arc::new(stub));
    let parent = resolver.resolve("token", "t3_abc").await.unwrap().unwrap();

    assert_eq!(parent.kind, ParentKind::Post);
    assert_eq!(parent.subreddit, "rust");
    assert_eq!(parent.title.as_deref(), Some("Some post"));
    assert!(parent.body.is_none());
}

#[tokio::test]
async fn any_other_prefix_is_a_comment() {
    let mut stub = StubApi::for_user("alice");
    stub.things.insert(
        "t1_def".to_string(),
        comment_thing("t1_def", "rust", "a reply"),
    );

    let resolver = ParentResolver::new(Arc::new(stub));
    let parent = resolver.resolve("token", "t1_def").await.unwrap().unwrap();

    assert_eq!(parent.kind, ParentKind::Comment);
    assert_eq!(parent.body.as_deref(), Some("a reply"));
}

#[tokio::test]
async fn a_missing_thing_resolves_to_none() {
    let resolver = ParentResolver::new(Arc::new(StubApi::for_user("alice")));
    let parent = resolver.resolve("token", "t3_gone").await.unwrap();
    assert!(parent.is_none());
}

#[tokio::test]
async fn comments_keep_their_order_and_optional_parents() {
    let mut stub = StubApi::for_user("alice");
    stub.comments = vec![
        comment("c1", "rust", Some("t3_p1")),
        comment("c2", "rust", None),
        comment("c3", "rust", Some("t1_missing")),
    ];
    stub.things
        .insert("t3_p1".to_string(), post_thing("t3_p1", "rust", "Thread"));

    let resolver = ParentResolver::new(Arc::new(stub));
    let with_parents = resolver
        .comments_with_parents("token", "alice", 10)
        .await
        .unwrap();

    assert_eq!(with_parents.len(), 3);
    assert_eq!(with_parents[0].comment.id, "c1");
    assert_eq!(
        with_parents[0].parent.as_ref().unwrap().kind,
        ParentKind::Post
    );
    // No parent reference at all.
    assert!(with_parents[1].parent.is_none());
    // A parent that no longer exists also resolves to None, not an error.
    assert!(with_parents[2].parent.is_none());
}

#[tokio::test]
async fn a_failed_lookup_propagates() {
    let mut stub = StubApi::for_user("alice");
    stub.comments = vec![comment("c1", "rust", Some("t3_p1"))];
    let stub = stub.fail_on("thing:t3_p1");

    let resolver = ParentResolver::new(Arc::new(stub));
    let result = resolver.comments_with_parents("token", "alice", 10).await;

    assert!(result.is_err());
}
