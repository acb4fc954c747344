use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Upload and output directories are distinct
/// - Maximum upload size is non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.storage.upload_dir == config.storage.output_dir {
        return Err(ConfigError::ValidationError(
            "storage.upload_dir and storage.output_dir must differ".to_string(),
        ));
    }

    if config.storage.max_upload_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "storage.max_upload_bytes cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, StorageConfig};
    use std::net::IpAddr;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_same_dirs_fails() {
        let config = Config {
            storage: StorageConfig {
                upload_dir: PathBuf::from("data"),
                output_dir: PathBuf::from("data"),
                max_upload_bytes: 1024,
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_upload_limit_fails() {
        let config = Config {
            storage: StorageConfig {
                max_upload_bytes: 0,
                ..StorageConfig::default()
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
