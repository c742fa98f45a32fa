//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::StudentStore;

/// Cloneable handle extracted in handlers with `State<AppState>`.
///
/// The store is opened before the router is built and injected here, so handlers
/// never reach for process-wide connection state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn StudentStore>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn StudentStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn StudentStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
