//! # Middleware Modules
//!
//! Tower/Axum middleware applied to the authenticated API surface.

pub mod metrics;
