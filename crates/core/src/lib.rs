//! campusdesk core - admission payment domain, services and traits.
//!
//! This crate holds the payment allocation rules of the back office.
//! It is transport-agnostic and defines the repository traits that the
//! `connect` crate implements against the remote REST API.

pub mod admissions;
pub mod agents;
pub mod constants;
pub mod errors;
pub mod payments;
pub mod users;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::ErrorKind;
pub use errors::Result;
