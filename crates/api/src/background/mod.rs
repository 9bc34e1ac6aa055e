//! Background maintenance jobs spawned from `main`.

pub mod auth_cleanup;
