//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Caller-scoped visibility
//! rules (owner/member, creator/assignee) live in the queries themselves
//! so no handler can accidentally widen them.

pub mod login_token_repo;
pub mod project_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;

pub use login_token_repo::LoginTokenRepo;
pub use project_repo::ProjectRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
