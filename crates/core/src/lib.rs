pub mod config;
pub mod engine;
pub mod job;
pub mod store;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EngineConfig,
    ServerConfig, StorageConfig,
};
pub use engine::{
    CancelCheck, ConversionEngine, ConversionProgress, ConversionRequest, EngineError,
    SimulatedEngine,
};
pub use job::{
    spawn_job, JobOptions, JobRecord, JobStatus, JobToken, JobTracker, SubmitError,
};
pub use store::{ArtifactStore, OutputEntry, SavedUpload, StoreError};
