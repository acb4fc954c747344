use std::sync::Arc;

use bookvox_core::{ArtifactStore, Config, ConversionEngine, JobTracker};

/// Shared application state
pub struct AppState {
    config: Config,
    store: ArtifactStore,
    engine: Arc<dyn ConversionEngine>,
    jobs: Arc<JobTracker>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: ArtifactStore,
        engine: Arc<dyn ConversionEngine>,
        jobs: Arc<JobTracker>,
    ) -> Self {
        Self {
            config,
            store,
            engine,
            jobs,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn engine(&self) -> &Arc<dyn ConversionEngine> {
        &self.engine
    }

    pub fn jobs(&self) -> &Arc<JobTracker> {
        &self.jobs
    }
}
