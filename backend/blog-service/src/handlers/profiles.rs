/// Author profile handler.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::cache::{ListingCache, ListingKey};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::pagination::{parse_page_param, Paginator};
use crate::services::{FollowService, PostService, UserService};

/// An author's posts plus whether the viewer follows them. Only the page
/// slice is cached; the follow flag is viewer-specific and always
/// computed fresh.
pub async fn profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<ListingCache>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: Option<CurrentUser>,
) -> Result<HttpResponse> {
    let username = path.into_inner();

    let author = UserService::new((**pool).clone())
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user {username}")))?;

    let service = PostService::new((**pool).clone());
    let total = service.count_by_author(author.id).await?;
    let paginator = Paginator::new(total, config.pagination.posts_per_page);
    let number = paginator.resolve_page(parse_page_param(query.page.as_deref()));

    let key = ListingKey::Profile(author.username.clone());
    let page = match cache.get(&key, number) {
        Some(cached) => cached,
        None => {
            let items = service
                .list_by_author(author.id, paginator.limit(), paginator.offset(number))
                .await?;
            let page = serde_json::to_value(paginator.page(number, items))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            cache.put(key, number, page.clone());
            page
        }
    };

    let following = match &viewer {
        Some(viewer) => {
            FollowService::new((**pool).clone())
                .is_following(viewer.id, author.id)
                .await?
        }
        None => false,
    };

    let context = serde_json::json!({
        "author": author,
        "page": page,
        "following": following,
    });

    Ok(HttpResponse::Ok().json(context))
}
