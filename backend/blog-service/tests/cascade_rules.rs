//! Storage-contract tests: delete rules, follow idempotency, and default
//! ordering, exercised through the service layer against a real Postgres.
mod common;

use sqlx::Row;

use blog_service::services::{CommentService, FollowService, GroupService, PostService, UserService};
use common::*;

#[actix_web::test]
async fn deleting_a_group_keeps_its_posts() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let group = create_group(&pool, "Test group", "test-slug").await;
    let post = create_post(&pool, &alice, "grouped post", Some(&group)).await;

    let deleted = GroupService::new(pool.clone())
        .delete_group(group.id)
        .await
        .unwrap();
    assert!(deleted);

    let survivor = PostService::new(pool.clone())
        .find_for_author("alice", post.id)
        .await
        .unwrap()
        .expect("post must survive its group");
    assert_eq!(survivor.group_id, None);
    assert_eq!(survivor.group_slug, None);
    assert_eq!(survivor.text, "grouped post");
}

#[actix_web::test]
async fn deleting_a_user_removes_their_posts_and_comments() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let alice_post = create_post(&pool, &alice, "alice writes", None).await;
    let bob_post = create_post(&pool, &bob, "bob writes", None).await;
    create_comment(&pool, bob_post.id, &alice, "alice comments").await;
    create_comment(&pool, bob_post.id, &bob, "bob comments").await;

    let deleted = UserService::new(pool.clone())
        .delete_user(alice.id)
        .await
        .unwrap();
    assert!(deleted);

    // Alice's post is gone, and so is her comment on Bob's post.
    assert_eq!(fetch_post_text(&pool, alice_post.id).await, None);
    assert_eq!(count_comments(&pool, bob_post.id).await, 1);
    // Bob's content is untouched.
    assert_eq!(
        fetch_post_text(&pool, bob_post.id).await.as_deref(),
        Some("bob writes")
    );
}

#[actix_web::test]
async fn deleting_a_post_removes_its_comments() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let post = create_post(&pool, &alice, "short-lived", None).await;
    create_comment(&pool, post.id, &bob, "first").await;
    create_comment(&pool, post.id, &bob, "second").await;

    let deleted = PostService::new(pool.clone())
        .delete_post(post.id)
        .await
        .unwrap();
    assert!(deleted);

    let orphans = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE post_id = $1")
        .bind(post.id)
        .fetch_one(&pool)
        .await
        .unwrap()
        .get::<i64, _>("count");
    assert_eq!(orphans, 0);
}

#[actix_web::test]
async fn follow_is_idempotent_and_unfollow_clears_it() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let service = FollowService::new(pool.clone());

    assert!(service.follow(bob.id, alice.id).await.unwrap());
    assert!(!service.follow(bob.id, alice.id).await.unwrap());
    assert_eq!(count_follow_rows(&pool, bob.id, alice.id).await, 1);
    assert!(service.is_following(bob.id, alice.id).await.unwrap());

    assert!(service.unfollow(bob.id, alice.id).await.unwrap());
    assert!(!service.unfollow(bob.id, alice.id).await.unwrap());
    assert_eq!(count_follow_rows(&pool, bob.id, alice.id).await, 0);
    assert!(!service.is_following(bob.id, alice.id).await.unwrap());
}

#[actix_web::test]
async fn listings_read_newest_first() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let post_service = PostService::new(pool.clone());
    let comment_service = CommentService::new(pool.clone());

    let first = create_post(&pool, &alice, "first", None).await;
    let second = create_post(&pool, &alice, "second", None).await;
    let third = create_post(&pool, &alice, "third", None).await;

    let listed = post_service.list_all(10, 0).await.unwrap();
    let ids: Vec<_> = listed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    create_comment(&pool, first.id, &alice, "older comment").await;
    create_comment(&pool, first.id, &alice, "newer comment").await;
    let comments = comment_service.list_for_post(first.id).await.unwrap();
    assert_eq!(comments[0].text, "newer comment");
    assert_eq!(comments[1].text, "older comment");
}

#[actix_web::test]
async fn feed_queries_follow_the_follow_graph() {
    let pool = setup_test_db().await;
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    let carol = create_user(&pool, "carol").await;
    create_post(&pool, &alice, "from alice", None).await;
    create_post(&pool, &carol, "from carol", None).await;
    follow(&pool, &bob, &alice).await;

    let service = PostService::new(pool.clone());
    assert_eq!(service.count_feed(bob.id).await.unwrap(), 1);
    let feed = service.list_feed(bob.id, 10, 0).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].text, "from alice");

    // Carol follows nobody; her feed is empty.
    assert_eq!(service.count_feed(carol.id).await.unwrap(), 0);
}
