//! Authentication middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated caller from a JWT
//!   Bearer token. Every access-layer operation takes the caller identity
//!   through this extractor, never from ambient global state.

pub mod auth;
