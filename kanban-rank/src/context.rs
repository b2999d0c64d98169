//! BoardContext - what every command gets to work with
//!
//! The context provides access to storage and configuration. No business
//! logic lives here; commands do all the work.

use crate::config::RankConfig;
use crate::rank::RankCodec;
use crate::store::BoardStore;
use std::sync::Arc;

/// Context passed to every command - provides access, not logic
#[derive(Clone)]
pub struct BoardContext {
    store: Arc<dyn BoardStore>,
    config: RankConfig,
}

impl BoardContext {
    /// Create a context over `store` with default configuration
    pub fn new(store: Arc<dyn BoardStore>) -> Self {
        Self::with_config(store, RankConfig::default())
    }

    /// Create a context with explicit configuration
    pub fn with_config(store: Arc<dyn BoardStore>, config: RankConfig) -> Self {
        Self { store, config }
    }

    /// The storage collaborator
    pub fn store(&self) -> &dyn BoardStore {
        self.store.as_ref()
    }

    pub fn config(&self) -> &RankConfig {
        &self.config
    }

    /// Rank codec configured for this context
    pub fn codec(&self) -> RankCodec {
        self.config.codec()
    }
}

impl std::fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
