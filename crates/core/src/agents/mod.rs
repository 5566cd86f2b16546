//! Agents module - referrer models and the roster repository contract.

mod agents_model;
mod agents_traits;

pub use agents_model::{Agent, AgentType};
pub use agents_traits::AgentRepositoryTrait;
