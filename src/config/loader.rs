//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::FacadeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the static upstream bearer token.
pub const TOKEN_ENV: &str = "NOTION_TOKEN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<FacadeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FacadeConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Apply environment overrides to `config`, then validate it.
pub fn finalize(mut config: FacadeConfig) -> Result<FacadeConfig, ConfigError> {
    apply_token_override(&mut config, std::env::var(TOKEN_ENV).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// A non-empty token from the environment replaces the configured one.
fn apply_token_override(config: &mut FacadeConfig, env_token: Option<String>) {
    if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
        config.upstream.token = Some(token.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_token_overrides_file_token() {
        let mut config = FacadeConfig::default();
        config.upstream.token = Some("from-file".into());

        apply_token_override(&mut config, Some("from-env".into()));
        assert_eq!(config.upstream.token.as_deref(), Some("from-env"));

        apply_token_override(&mut config, Some("   ".into()));
        assert_eq!(config.upstream.token.as_deref(), Some("from-env"));

        apply_token_override(&mut config, None);
        assert_eq!(config.upstream.token.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = std::env::temp_dir().join("content_edge_invalid_config.toml");
        fs::write(&path, "[upstream]\ntimeout_secs = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("upstream.timeout_secs"));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join("content_edge_broken_config.toml");
        fs::write(&path, "[listener\nbind_address = 1").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
