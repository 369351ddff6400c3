/// Session identity for request handlers.
///
/// Authentication itself (credentials, login pages, token issuance) lives
/// in a separate subsystem; this module only consumes its session tokens.
/// A token is an HS256 JWT carrying the user id and username, presented
/// either as the `session` cookie or as a bearer Authorization header.
/// Handlers take `CurrentUser` to require a signed-in caller (failures
/// redirect to the login entry point) or `Option<CurrentUser>` when
/// identity merely personalizes the response.
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "session";

const DEFAULT_LOGIN_URL: &str = "/auth/login";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    username: String,
    exp: i64,
}

/// The caller's identity as established by the auth subsystem.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Mint a session token. Used by the auth collaborator and test fixtures;
/// the service itself only validates.
pub fn issue_session_token(
    secret: &str,
    user_id: Uuid,
    username: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn validate_session_token(secret: &str, token: &str) -> Option<CurrentUser> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    let id = Uuid::parse_str(&data.claims.sub).ok()?;
    Some(CurrentUser {
        id,
        username: data.claims.username,
    })
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }
    req.headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let config = req.app_data::<web::Data<Config>>();
        let user = config.and_then(|cfg| {
            token_from_request(req)
                .and_then(|token| validate_session_token(&cfg.auth.session_secret, &token))
        });
        let login_url = config
            .map(|cfg| cfg.auth.login_url.clone())
            .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_string());

        ready(user.ok_or_else(|| AppError::Unauthenticated {
            login_url,
            next: req.path().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_round_trips() {
        let user_id = Uuid::new_v4();
        let token = issue_session_token("secret", user_id, "alice", 60).unwrap();
        let user = validate_session_token("secret", &token).expect("token should validate");
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_session_token("secret", Uuid::new_v4(), "alice", 60).unwrap();
        assert!(validate_session_token("other-secret", &token).is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_session_token("secret", Uuid::new_v4(), "alice", -120).unwrap();
        assert!(validate_session_token("secret", &token).is_none());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_session_token("secret", "not-a-token").is_none());
    }
}
