/// Error types for blog-service
///
/// Handler errors are converted to HTTP responses at the actix boundary:
/// unknown resources become the fixed 404 page, missing authentication
/// becomes a redirect into the auth subsystem's login entry point, and
/// everything unexpected surfaces as a generic 500. Form validation
/// failures and the edit-by-non-author redirect are not errors; handlers
/// return those responses directly.
use actix_web::http::{header, StatusCode};
use actix_web::{error::ResponseError, HttpResponse};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication required for {next}")]
    Unauthenticated { login_url: String, next: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn login_redirect_target(login_url: &str, next: &str) -> String {
        format!("{}?next={}", login_url, urlencoding::encode(next))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated { .. } => StatusCode::FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(what) => {
                tracing::debug!(%what, "replying 404");
                HttpResponse::NotFound().json(serde_json::json!({
                    "status": 404,
                    "detail": what,
                }))
            }
            AppError::Unauthenticated { login_url, next } => {
                tracing::debug!(%next, "unauthenticated, redirecting to login");
                HttpResponse::Found()
                    .insert_header((
                        header::LOCATION,
                        Self::login_redirect_target(login_url, next),
                    ))
                    .finish()
            }
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "replying 500");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "status": 500,
                    "detail": "Internal server error",
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_encodes_next_path() {
        let target = AppError::login_redirect_target("/auth/login", "/new");
        assert_eq!(target, "/auth/login?next=%2Fnew");
    }

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(
            AppError::NotFound("post".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unauthenticated {
                login_url: "/auth/login".into(),
                next: "/new".into()
            }
            .status_code(),
            StatusCode::FOUND
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
