//! campusdesk connect - REST client for the back-office API.
//!
//! This crate implements the repository traits of `campusdesk-core` over
//! HTTP. It owns every reqwest type; callers only see core errors.

pub mod client;
pub mod session;

pub use client::{ApiClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use session::Session;
