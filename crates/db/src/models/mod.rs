//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (optional fields) for patches

pub mod login_token;
pub mod project;
pub mod session;
pub mod task;
pub mod user;
