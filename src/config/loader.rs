//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Invalid value '{value}' for {var}")]
    Env { var: &'static str, value: String },

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

/// Load a `.env` file from the working directory (or a parent) into the
/// process environment. Variables already set are not overwritten. Returns
/// the path that was loaded, or `None` when there is no such file.
pub fn load_env_file() -> Result<Option<PathBuf>, ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Load configuration: optional TOML file, then environment overrides,
/// then validation.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` returns the value of a variable if set. Empty values are
/// ignored so that `PORT=` in an env file does not clobber the default.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.is_empty());

    if let Some(v) = get("IFLYTEK_APPID") {
        config.upstream.app_id = v;
    }
    if let Some(v) = get("IFLYTEK_APIKEY") {
        config.upstream.api_key = v;
    }
    if let Some(v) = get("IFLYTEK_ISE_URL") {
        config.upstream.url = v;
    }
    if let Some(v) = get("PLUGIN_TOKEN") {
        config.auth.token = v;
    }
    if let Some(v) = get("HOST") {
        config.listener.host = v;
    }
    if let Some(v) = get("PORT") {
        config.listener.port = parse_var("PORT", v)?;
    }
    if let Some(v) = get("MAX_AUDIO_BYTES") {
        config.limits.max_audio_bytes = parse_var("MAX_AUDIO_BYTES", v)?;
    }
    if let Some(v) = get("MAX_BODY_BYTES") {
        config.limits.max_body_bytes = parse_var("MAX_BODY_BYTES", v)?;
    }
    if let Some(v) = get("WORKERS") {
        config.server.workers = parse_var("WORKERS", v)?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.observability.log_level = v;
    }

    Ok(())
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
