//! Request handlers.
//!
//! Each submodule provides async handler functions for a single resource.
//! Handlers carry the authorization rules (owner/member for projects,
//! creator/assignee for tasks): they resolve the caller via [`AuthUser`],
//! authorize against the fetched row, then delegate to the corresponding
//! repository in `taskflow_db`, mapping errors via [`AppError`].
//!
//! [`AuthUser`]: crate::middleware::auth::AuthUser
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod project;
pub mod task;
pub mod user;

use taskflow_core::error::CoreError;

/// Minimal email shape check: one `@` with non-empty local and domain parts.
///
/// Intentionally loose; the address is only ever used as a mailto target and
/// a login handle, deliverability is proven by the sign-in link itself.
pub(crate) fn validate_email(email: &str) -> Result<(), CoreError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && domain.contains('.') && !email.contains(' ')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid email address: {email}"
        )))
    }
}
