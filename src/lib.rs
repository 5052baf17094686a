//! Typed client for the membership management API.
//!
//! [`http::ApiClient`] is the core: verb helpers whose every call resolves to
//! a [`http::SuccessEnvelope`] or an [`http::ErrorEnvelope`]. The [`api`]
//! module wraps the individual endpoints and [`session`] tracks sign-in state.

pub mod api;
pub mod commands;
pub mod http;
pub mod session;
