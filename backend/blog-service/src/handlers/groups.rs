/// Group listing handler.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::cache::{ListingCache, ListingKey};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::handlers::PageQuery;
use crate::pagination::{parse_page_param, Paginator};
use crate::services::{GroupService, PostService};

/// Posts belonging to one group, newest first. Unknown slugs 404.
pub async fn group_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<ListingCache>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let slug = path.into_inner();

    let group = GroupService::new((**pool).clone())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No group with slug {slug}")))?;

    let service = PostService::new((**pool).clone());
    let total = service.count_by_group(group.id).await?;
    let paginator = Paginator::new(total, config.pagination.posts_per_page);
    let number = paginator.resolve_page(parse_page_param(query.page.as_deref()));

    let key = ListingKey::Group(group.slug.clone());
    if let Some(context) = cache.get(&key, number) {
        return Ok(HttpResponse::Ok().json(context));
    }

    let items = service
        .list_by_group(group.id, paginator.limit(), paginator.offset(number))
        .await?;
    let context = serde_json::json!({
        "group": group,
        "page": paginator.page(number, items),
    });
    cache.put(key, number, context.clone());

    Ok(HttpResponse::Ok().json(context))
}
