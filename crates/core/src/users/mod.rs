//! Users module - the signed-in user and role permissions.

mod users_model;

pub use users_model::{CurrentUser, UserRole};
