/// Blog Service Library
///
/// A blogging platform: users author posts, organize them into groups,
/// comment on posts, and follow other authors to curate a personalized
/// feed. Presentation and authentication are external collaborators;
/// handlers produce context mappings and consume session tokens.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for users, groups, posts, comments, follows
/// - `services`: Business logic layer
/// - `forms`: Form validation for submitted posts and comments
/// - `pagination`: Fixed-size page math for listings
/// - `cache`: Listing cache with explicit invalidation
/// - `auth`: Session identity extraction
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
