//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`magic_link`] -- email sign-in link generation and SMTP delivery.

pub mod jwt;
pub mod magic_link;
