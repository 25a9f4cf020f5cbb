use std::sync::Arc;

use anyhow::Context;
use rizz_app::App;
use rizz_auth::{AuthError, token_store};
use rizz_client::{Backend, HttpBackend};
use rizz_config::RizzConfig;
use rizz_core::Session;

/// Shared state for command handlers.
pub struct CliContext {
    pub config: RizzConfig,
    pub backend: Arc<dyn Backend>,
    pub app: App,
}

impl CliContext {
    pub fn init(config: RizzConfig) -> anyhow::Result<Self> {
        let backend: Arc<dyn Backend> = Arc::new(
            HttpBackend::new(&config.backend).context("failed to build the backend client")?,
        );
        tracing::debug!(base_url = %config.backend.normalized_base_url(), "backend configured");
        let app = App::new(Arc::clone(&backend), &config);
        Ok(Self {
            config,
            backend,
            app,
        })
    }

    /// Resume the persisted session and enter the directory.
    pub fn resume(&self) -> anyhow::Result<Session> {
        let (session, source) = token_store::load().ok_or(AuthError::NotAuthenticated)?;
        tracing::debug!(source = source.as_str(), username = %session.username, "session resumed");
        self.app.resume(session.clone())?;
        Ok(session)
    }
}
