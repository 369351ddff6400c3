/// Business logic layer: one service per entity area, each a thin
/// query wrapper around the shared `PgPool`.
pub mod comments;
pub mod follow;
pub mod groups;
pub mod posts;
pub mod users;

pub use comments::CommentService;
pub use follow::FollowService;
pub use groups::GroupService;
pub use posts::PostService;
pub use users::UserService;
