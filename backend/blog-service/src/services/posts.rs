/// Post service - creation, edits, and the paginated listings.
///
/// Listing queries join the author and optional group so handlers can
/// build contexts without extra round trips. Every listing reads
/// newest-first.
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Post, PostItem};

const POST_ITEM_SELECT: &str = r#"
    SELECT p.id, p.text, p.pub_date, p.image,
           p.author_id, u.username AS author_username,
           p.group_id, g.slug AS group_slug, g.title AS group_title
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

pub struct PostService {
    pool: PgPool,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new post. `pub_date` is assigned by the store and never
    /// changes afterwards.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (text, author_id, group_id, image)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, pub_date, author_id, group_id, image
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(group_id)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    /// Update a post's editable fields in place; author and pub_date are
    /// untouched.
    pub async fn update_post(
        &self,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&str>,
    ) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2, image = $3
            WHERE id = $4
            RETURNING id, text, pub_date, author_id, group_id, image
            "#,
        )
        .bind(text)
        .bind(group_id)
        .bind(image)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// Find a post scoped to its author's username; a valid post id under
    /// the wrong username is treated as absent.
    pub async fn find_for_author(&self, username: &str, post_id: Uuid) -> Result<Option<PostItem>> {
        let sql = format!("{POST_ITEM_SELECT} WHERE p.id = $1 AND u.username = $2");
        let post = sqlx::query_as::<_, PostItem>(&sql)
            .bind(post_id)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(post)
    }

    pub async fn count_all(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<PostItem>> {
        let sql = format!("{POST_ITEM_SELECT} ORDER BY p.pub_date DESC LIMIT $1 OFFSET $2");
        let posts = sqlx::query_as::<_, PostItem>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn count_by_group(&self, group_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    pub async fn list_by_group(
        &self,
        group_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostItem>> {
        let sql = format!(
            "{POST_ITEM_SELECT} WHERE p.group_id = $1 ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostItem>(&sql)
            .bind(group_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    pub async fn count_by_author(&self, author_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    pub async fn list_by_author(
        &self,
        author_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PostItem>> {
        let sql = format!(
            "{POST_ITEM_SELECT} WHERE p.author_id = $1 ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostItem>(&sql)
            .bind(author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Posts authored by users the given user follows.
    pub async fn count_feed(&self, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM posts
            WHERE author_id IN (SELECT author_id FROM follows WHERE user_id = $1)
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i64, _>("count"))
    }

    pub async fn list_feed(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<PostItem>> {
        let sql = format!(
            "{POST_ITEM_SELECT} \
             WHERE p.author_id IN (SELECT author_id FROM follows WHERE user_id = $1) \
             ORDER BY p.pub_date DESC LIMIT $2 OFFSET $3"
        );
        let posts = sqlx::query_as::<_, PostItem>(&sql)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    /// Remove a post. Its comments go with it (enforced by the schema's
    /// delete rules).
    pub async fn delete_post(&self, post_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
