use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Artifact storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding pending uploads
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Directory holding finished audiobooks
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output_audiobooks")
}

fn default_max_upload_bytes() -> u64 {
    100 * 1024 * 1024 // 100 MiB
}

/// Conversion engine configuration
///
/// The shipped engine simulates the analysis and synthesis phases on a
/// timer; the step delays here control its pacing. Tests shrink them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Delay between text analysis progress steps, in milliseconds
    #[serde(default = "default_analysis_step_ms")]
    pub analysis_step_ms: u64,
    /// Delay between audio synthesis progress steps, in milliseconds
    #[serde(default = "default_synthesis_step_ms")]
    pub synthesis_step_ms: u64,
    /// Delay for the final assembly step, in milliseconds
    #[serde(default = "default_finalize_ms")]
    pub finalize_ms: u64,
    /// Whether the engine reports itself as available on /health
    #[serde(default = "default_true")]
    pub available: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analysis_step_ms: default_analysis_step_ms(),
            synthesis_step_ms: default_synthesis_step_ms(),
            finalize_ms: default_finalize_ms(),
            available: true,
        }
    }
}

fn default_analysis_step_ms() -> u64 {
    2000
}

fn default_synthesis_step_ms() -> u64 {
    3000
}

fn default_finalize_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}
