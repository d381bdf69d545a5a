//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user behind a JWT.
//! - [`rbac::RequireAdmin`] -- requires the admin flag.
//! - [`access::authorize`] -- runs the access evaluator against the store.

pub mod access;
pub mod auth;
pub mod rbac;
