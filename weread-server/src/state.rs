//! Application state

use anyhow::Result;
use std::sync::Arc;
use weread_core::{ClientConfig, Credential, ReadingApi, SessionClient, WereadTools};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Tool facade over the process-wide session client
    pub tools: WereadTools,
}

impl AppState {
    /// Build state around any reading API
    pub fn new(api: Arc<dyn ReadingApi>) -> Self {
        Self {
            tools: WereadTools::new(api),
        }
    }

    /// Create state from `WEREAD_COOKIE` and the `WEREAD_*` client settings.
    ///
    /// A missing cookie is not fatal: the server starts and every provider
    /// call reports an auth error until it is configured.
    pub fn from_env() -> Result<Self> {
        let credential = Credential::new(std::env::var("WEREAD_COOKIE").unwrap_or_default());
        if credential.is_empty() {
            tracing::warn!("WEREAD_COOKIE is not set; provider calls will fail with auth_error");
        }

        let config = ClientConfig::from_env();
        tracing::info!(api_base = %config.api_base, timeout = ?config.timeout, "configuring session client");
        let client = SessionClient::new(config, credential)?;

        Ok(Self::new(Arc::new(client)))
    }
}
