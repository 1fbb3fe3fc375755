use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::CoreState;

/// Application state that can be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Upstream clients built from the configuration
    pub core_state: Arc<CoreState>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let core_state = CoreState::new(&config)?;
        Ok(Arc::new(Self { config, core_state }))
    }

    /// State with caller-supplied collaborators
    pub fn with_core_state(config: ServerConfig, core_state: CoreState) -> Arc<Self> {
        Arc::new(Self {
            config,
            core_state: Arc::new(core_state),
        })
    }
}
