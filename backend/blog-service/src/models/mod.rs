/// Data models for blog-service
///
/// Entities are stored in Postgres and mapped with `sqlx::FromRow`:
/// - User: author identity (credentials live in the auth subsystem)
/// - Group: a named community posts can belong to
/// - Post: authored text with an optional group and image attachment
/// - Comment: a reply attached to a post
/// - Follow: directed "user follows author" relation
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Post row joined with its author and (optional) group, the shape listing
/// and detail contexts are built from.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostItem {
    pub id: Uuid,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
}

/// Comment row joined with its author.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentItem {
    pub id: Uuid,
    pub post_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
}
