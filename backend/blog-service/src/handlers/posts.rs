/// Post handlers: the home listing, post detail, and the create/edit
/// workflows.
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::auth::CurrentUser;
use crate::cache::{ListingCache, ListingKey};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::forms::{push_field_error, CleanPost, FieldErrors, PostForm, MSG_BAD_GROUP};
use crate::handlers::{
    form_context, parse_post_id, post_detail_url, redirect, PageQuery,
};
use crate::models::{Group, PostItem};
use crate::pagination::{parse_page_param, Paginator};
use crate::services::{CommentService, GroupService, PostService};

/// All posts, newest first.
pub async fn index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    cache: web::Data<ListingCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = PostService::new((**pool).clone());

    let total = service.count_all().await?;
    let paginator = Paginator::new(total, config.pagination.posts_per_page);
    let number = paginator.resolve_page(parse_page_param(query.page.as_deref()));

    if let Some(context) = cache.get(&ListingKey::Home, number) {
        return Ok(HttpResponse::Ok().json(context));
    }

    let items = service
        .list_all(paginator.limit(), paginator.offset(number))
        .await?;
    let context = serde_json::json!({ "page": paginator.page(number, items) });
    cache.put(ListingKey::Home, number, context.clone());

    Ok(HttpResponse::Ok().json(context))
}

/// Empty post form for the create page.
pub async fn new_post(_user: CurrentUser) -> Result<HttpResponse> {
    let context = serde_json::json!({
        "form": form_context(&PostForm::default(), &FieldErrors::new()),
    });
    Ok(HttpResponse::Ok().json(context))
}

/// Resolve the group chosen on a form against the store. A submitted id
/// that matches no group becomes a field error, same as a malformed one.
async fn resolve_group(
    groups: &GroupService,
    clean: &CleanPost,
    errors: &mut FieldErrors,
) -> Result<Option<Group>> {
    match clean.group_id {
        None => Ok(None),
        Some(group_id) => match groups.find_by_id(group_id).await? {
            Some(group) => Ok(Some(group)),
            None => {
                push_field_error(errors, "group", MSG_BAD_GROUP);
                Ok(None)
            }
        },
    }
}

/// Create a post authored by the caller; invalid submissions re-render
/// the form with field errors and persist nothing.
pub async fn create_post(
    pool: web::Data<PgPool>,
    cache: web::Data<ListingCache>,
    user: CurrentUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            let context = serde_json::json!({ "form": form_context(&*form, &errors) });
            return Ok(HttpResponse::Ok().json(context));
        }
    };

    let groups = GroupService::new((**pool).clone());
    let mut errors = FieldErrors::new();
    let group = resolve_group(&groups, &clean, &mut errors).await?;
    if !errors.is_empty() {
        let context = serde_json::json!({ "form": form_context(&*form, &errors) });
        return Ok(HttpResponse::Ok().json(context));
    }

    let service = PostService::new((**pool).clone());
    service
        .create_post(
            user.id,
            &clean.text,
            clean.group_id,
            clean.image.as_deref(),
        )
        .await?;

    cache.invalidate_post_listings(&user.username, group.as_ref().map(|g| g.slug.as_str()));

    Ok(redirect("/".to_string()))
}

/// One post with its comments and an empty comment form.
pub async fn post_detail(
    pool: web::Data<PgPool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    let service = PostService::new((**pool).clone());
    let post = service
        .find_for_author(&username, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {post_id} by {username}")))?;

    let comments = CommentService::new((**pool).clone())
        .list_for_post(post.id)
        .await?;

    let context = serde_json::json!({
        "author": { "id": post.author_id, "username": post.author_username },
        "post": post,
        "comments": comments,
        "form": form_context(&crate::forms::CommentForm::default(), &FieldErrors::new()),
    });

    Ok(HttpResponse::Ok().json(context))
}

fn form_from_post(post: &PostItem) -> PostForm {
    PostForm {
        text: post.text.clone(),
        group: post.group_id.map(|id| id.to_string()),
        image: post.image.clone(),
    }
}

/// Edit form populated from the stored post. A caller who is not the
/// author is silently redirected to the post's detail view.
pub async fn edit_post_form(
    pool: web::Data<PgPool>,
    path: web::Path<(String, String)>,
    user: CurrentUser,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    if user.username != username {
        return Ok(redirect(post_detail_url(&username, post_id)));
    }

    let service = PostService::new((**pool).clone());
    let post = service
        .find_for_author(&username, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {post_id} by {username}")))?;

    let context = serde_json::json!({
        "post": post,
        "form": form_context(&form_from_post(&post), &FieldErrors::new()),
    });

    Ok(HttpResponse::Ok().json(context))
}

/// Update a post in place. Only the author may edit; anyone else is
/// redirected to the detail view without modification.
pub async fn edit_post(
    pool: web::Data<PgPool>,
    cache: web::Data<ListingCache>,
    path: web::Path<(String, String)>,
    user: CurrentUser,
    form: web::Form<PostForm>,
) -> Result<HttpResponse> {
    let (username, raw_post_id) = path.into_inner();
    let post_id = parse_post_id(&raw_post_id)?;

    if user.username != username {
        return Ok(redirect(post_detail_url(&username, post_id)));
    }

    let service = PostService::new((**pool).clone());
    let post = service
        .find_for_author(&username, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {post_id} by {username}")))?;

    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            let context = serde_json::json!({
                "post": post,
                "form": form_context(&*form, &errors),
            });
            return Ok(HttpResponse::Ok().json(context));
        }
    };

    let groups = GroupService::new((**pool).clone());
    let mut errors = FieldErrors::new();
    let new_group = resolve_group(&groups, &clean, &mut errors).await?;
    if !errors.is_empty() {
        let context = serde_json::json!({
            "post": post,
            "form": form_context(&*form, &errors),
        });
        return Ok(HttpResponse::Ok().json(context));
    }

    service
        .update_post(
            post.id,
            &clean.text,
            clean.group_id,
            clean.image.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {post_id} by {username}")))?;

    // The post may have moved between group listings; clear both sides.
    cache.invalidate_post_listings(&user.username, post.group_slug.as_deref());
    if let Some(group) = &new_group {
        cache.invalidate(&ListingKey::Group(group.slug.clone()));
    }

    Ok(redirect(post_detail_url(&username, post_id)))
}
