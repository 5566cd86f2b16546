use async_trait::async_trait;

use super::agents_model::Agent;
use crate::errors::Result;

/// Read access to the agent directory held by the remote API.
#[async_trait]
pub trait AgentRepositoryTrait: Send + Sync {
    /// Lists agents, at most `limit` of them.
    async fn list_agents(&self, limit: u32) -> Result<Vec<Agent>>;
}
