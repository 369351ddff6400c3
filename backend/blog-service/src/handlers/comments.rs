/// Comment handler: attach a comment to a post.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::forms::CommentForm;
use crate::handlers::{form_context, parse_post_id, post_detail_url, redirect};
use crate::services::{CommentService, PostService};

/// Persist a comment by the caller on the addressed post; empty text
/// re-renders the comment form with errors and persists nothing.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    path: web::Path<(String, String)>,
    user: CurrentUser,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    let post = PostService::new((**pool).clone())
        .find_for_author(&username, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {post_id} by {username}")))?;

    match form.clean() {
        Ok(text) => {
            CommentService::new((**pool).clone())
                .create_comment(post.id, user.id, &text)
                .await?;
            Ok(redirect(post_detail_url(&username, post.id)))
        }
        Err(errors) => {
            let context = serde_json::json!({
                "post": post,
                "form": form_context(&*form, &errors),
            });
            Ok(HttpResponse::Ok().json(context))
        }
    }
}
