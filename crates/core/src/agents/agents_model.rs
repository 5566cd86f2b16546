//! Agent domain models.

use serde::{Deserialize, Serialize};

/// Role an agent plays on an admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    Main,
    College,
    Sub,
}

impl AgentType {
    pub fn label(&self) -> &'static str {
        match self {
            AgentType::Main => "Main Agent",
            AgentType::College => "College Agent",
            AgentType::Sub => "Sub Agent",
        }
    }
}

/// A third-party referrer entitled to a fee, who may also collect and
/// forward student payments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub agent_type: Option<AgentType>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
