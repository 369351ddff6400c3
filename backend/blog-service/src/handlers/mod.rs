/// HTTP layer: one handler per user-facing action.
///
/// Handlers produce either a context mapping (JSON consumed by the
/// presentation collaborator) or a redirect. Literal routes are
/// registered before the `{username}` captures so `/new`, `/group/...`
/// and `/follow` are never swallowed by the profile routes.
pub mod comments;
pub mod follows;
pub mod groups;
pub mod posts;
pub mod profiles;

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::AppError;
use crate::forms::FieldErrors;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/group/{slug}", web::get().to(groups::group_posts))
        .route("/new", web::get().to(posts::new_post))
        .route("/new", web::post().to(posts::create_post))
        .route("/follow", web::get().to(follows::follow_index))
        .route("/{username}/follow", web::get().to(follows::profile_follow))
        .route(
            "/{username}/unfollow",
            web::get().to(follows::profile_unfollow),
        )
        .route(
            "/{username}/{post_id}/edit",
            web::get().to(posts::edit_post_form),
        )
        .route(
            "/{username}/{post_id}/edit",
            web::post().to(posts::edit_post),
        )
        .route(
            "/{username}/{post_id}/comment",
            web::post().to(comments::add_comment),
        )
        .route("/{username}/{post_id}", web::get().to(posts::post_detail))
        .route("/{username}", web::get().to(profiles::profile))
        .route("/{username}", web::post().to(profiles::profile));
}

/// Fixed response for unknown paths.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "status": 404,
        "path": req.path(),
    }))
}

/// Raw `page` query value; anything unparseable falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

pub(crate) fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn post_detail_url(username: &str, post_id: Uuid) -> String {
    format!("/{username}/{post_id}/")
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/{username}/")
}

/// Post ids that do not parse are unknown paths, not bad requests.
pub(crate) fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("No post with id {raw}")))
}

pub(crate) fn form_context<F: serde::Serialize>(values: &F, errors: &FieldErrors) -> Value {
    serde_json::json!({
        "values": values,
        "errors": errors,
    })
}
