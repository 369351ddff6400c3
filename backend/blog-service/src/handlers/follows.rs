/// Follow handlers: the personalized feed and the follow/unfollow
/// actions.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::cache::{ListingCache, ListingKey};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::{profile_url, redirect, PageQuery};
use crate::pagination::{parse_page_param, Paginator};
use crate::services::{FollowService, PostService, UserService};

/// Posts from authors the caller follows, newest first.
pub async fn follow_index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<ListingCache>,
    query: web::Query<PageQuery>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());

    let total = service.count_feed(user.id).await?;
    let paginator = Paginator::new(total, config.pagination.posts_per_page);
    let number = paginator.resolve_page(parse_page_param(query.page.as_deref()));

    let key = ListingKey::Feed(user.id);
    if let Some(context) = cache.get(&key, number) {
        return Ok(HttpResponse::Ok().json(context));
    }

    let items = service
        .list_feed(user.id, paginator.limit(), paginator.offset(number))
        .await?;
    let context = serde_json::json!({ "page": paginator.page(number, items) });
    cache.put(key, number, context.clone());

    Ok(HttpResponse::Ok().json(context))
}

/// Start following an author. Following yourself is silently ignored;
/// repeating an existing follow changes nothing.
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    cache: web::Data<ListingCache>,
    path: web::Path<String>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let username = path.into_inner();

    let author = UserService::new((**pool).clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user {username}")))?;

    if author.id == user.id {
        return Ok(redirect("/".to_string()));
    }

    FollowService::new((**pool).clone())
        .follow(user.id, author.id)
        .await?;
    cache.invalidate_feed(user.id);

    Ok(redirect(profile_url(&username)))
}

/// Stop following an author. 404 when no such follow exists.
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    cache: web::Data<ListingCache>,
    path: web::Path<String>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let username = path.into_inner();

    let author = UserService::new((**pool).clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user {username}")))?;

    let removed = FollowService::new((**pool).clone())
        .unfollow(user.id, author.id)
        .await?;
    if !removed {
        return Err(AppError::NotFound(format!(
            "{} does not follow {username}",
            user.username
        )));
    }
    cache.invalidate_feed(user.id);

    Ok(redirect(profile_url(&username)))
}
