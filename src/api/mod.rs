//! Typed wrappers for the membership API endpoints.

pub mod auth;
pub mod member;
pub mod profile;
pub mod signup;
mod types;

pub use types::*;
