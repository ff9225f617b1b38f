use anyhow::{Result, bail};
use std::env;

/// Broker endpoint used when INFRA_ENDPOINT is not set.
pub const DEFAULT_ENDPOINT: &str = "infra-k8s.supervity.ai";

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Presence check only; the broker is the authority on validity.
    pub fn new(username: &str, password: &str) -> Result<Self> {
        if username.trim().is_empty() {
            bail!("INFRA_USER is not set");
        }
        if password.trim().is_empty() {
            bail!("INFRA_PASSWORD is not set");
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Read credentials from the environment, consulting a local .env file
    /// first. A missing or unreadable .env is ignored.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let username = env::var("INFRA_USER").unwrap_or_default();
        let password = env::var("INFRA_PASSWORD").unwrap_or_default();
        Self::new(&username, &password)
    }
}

/// Endpoint of the Infra broker, overridable via INFRA_ENDPOINT.
pub fn broker_endpoint() -> String {
    endpoint_or_default(env::var("INFRA_ENDPOINT").ok())
}

pub fn endpoint_or_default(raw: Option<String>) -> String {
    raw.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
}
