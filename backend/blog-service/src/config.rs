/// Configuration management for blog-service
///
/// Configuration is loaded from environment variables with development
/// defaults; production refuses to start without an explicit session
/// secret.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Listing pagination
    pub pagination: PaginationConfig,
    /// Listing cache
    pub cache: CacheConfig,
    /// Session/auth collaborator settings
    pub auth: AuthConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Posts per listing page
    pub posts_per_page: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached listing pages; 0 disables the cache
    pub listing_ttl_secs: u64,
}

/// Settings shared with the authentication subsystem: the key used to
/// validate its session tokens and where to send unauthenticated users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub session_secret: String,
    pub login_url: String,
    pub session_ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BLOG_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/folio".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            pagination: PaginationConfig {
                posts_per_page: std::env::var("POSTS_PER_PAGE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|v| *v > 0)
                    .unwrap_or(10),
            },
            cache: CacheConfig {
                listing_ttl_secs: std::env::var("LISTING_CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(20),
            },
            auth: AuthConfig {
                session_secret: resolve_session_secret(
                    &app_env,
                    std::env::var("SESSION_SECRET").ok(),
                )?,
                login_url: std::env::var("LOGIN_URL")
                    .unwrap_or_else(|_| "/auth/login".to_string()),
                session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(14 * 24 * 60 * 60),
            },
        })
    }
}

fn resolve_session_secret(app_env: &str, secret: Option<String>) -> Result<String, String> {
    match secret {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ if app_env.eq_ignore_ascii_case("production") => {
            Err("SESSION_SECRET must be set in production".to_string())
        }
        _ => Ok("dev-session-secret".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_secret_falls_back_outside_production() {
        assert_eq!(
            resolve_session_secret("development", None).unwrap(),
            "dev-session-secret"
        );
        assert_eq!(
            resolve_session_secret("development", Some("s3cret".into())).unwrap(),
            "s3cret"
        );
    }

    #[test]
    fn production_requires_explicit_session_secret() {
        assert!(resolve_session_secret("production", None).is_err());
        assert!(resolve_session_secret("production", Some("  ".into())).is_err());
        assert_eq!(
            resolve_session_secret("production", Some("s3cret".into())).unwrap(),
            "s3cret"
        );
    }
}
