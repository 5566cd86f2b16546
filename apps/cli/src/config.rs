use std::time::Duration;

use anyhow::{anyhow, Context};
use campusdesk_connect::{DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
use campusdesk_core::users::UserRole;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub access_token: String,
    pub user_id: String,
    pub user_name: String,
    pub user_role: UserRole,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = get("CD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let access_token = get("CD_ACCESS_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("CD_ACCESS_TOKEN must be set"))?;
        let user_role: UserRole = get("CD_USER_ROLE")
            .unwrap_or_else(|| "staff".into())
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("Invalid CD_USER_ROLE")?;
        let user_id = get("CD_USER_ID").unwrap_or_default();
        let user_name = get("CD_USER_NAME").unwrap_or_else(|| "cli".into());
        let timeout_ms: u64 = get("CD_REQUEST_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        Ok(Self {
            api_url,
            access_token,
            user_id,
            user_name,
            user_role,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}
