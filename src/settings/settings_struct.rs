use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::http::DEFAULT_TIMEOUT;

pub fn default_proxy_group_name() -> String {
    "🚀 节点选择".to_string()
}

pub fn default_output() -> String {
    "clash_config.yaml".to_string()
}

pub fn default_fetch_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

pub fn default_user_agent() -> String {
    "subclash".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Converter settings
///
/// Every field has a default, so a settings file only needs the keys it
/// overrides. Command-line flags are applied on top by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name of the main selector group in the skeleton configuration.
    pub proxy_group_name: String,
    /// Where the generated configuration is written.
    pub output: String,
    /// Optional YAML template; the skeleton is used when unset.
    pub template_path: Option<String>,
    /// Subscription fetch timeout in seconds.
    pub fetch_timeout: u64,
    pub user_agent: String,
    /// Default `env_logger` filter, overridden by `RUST_LOG`.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            proxy_group_name: default_proxy_group_name(),
            output: default_output(),
            template_path: None,
            fetch_timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Parse settings text. `.toml` paths use TOML, everything else YAML.
    pub fn load_from_content(content: &str, is_toml: bool) -> Result<Self, SettingsError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        if is_toml {
            Ok(toml::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }

    /// Load settings from a file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        Self::load_from_content(&content, is_toml)
    }
}
