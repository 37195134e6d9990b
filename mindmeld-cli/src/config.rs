//! CLI configuration handling.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use mindmeld_core::{DEFAULT_BALANCE_URL, DEFAULT_PORTRAIT_URL};

/// Environment variable overriding the configured key list (comma-separated).
pub const KEYS_ENV_VAR: &str = "MINDMELD_API_KEYS";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered image-API key pool, rotated in this order.
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Balance-check endpoint used to validate keys.
    #[serde(default = "default_balance_url")]
    pub balance_url: String,

    /// Portrait-generation endpoint.
    #[serde(default = "default_portrait_url")]
    pub portrait_url: String,
}

fn default_balance_url() -> String {
    DEFAULT_BALANCE_URL.to_string()
}

fn default_portrait_url() -> String {
    DEFAULT_PORTRAIT_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            balance_url: default_balance_url(),
            portrait_url: default_portrait_url(),
        }
    }
}

/// Load configuration from the default location or fall back to defaults.
///
/// `MINDMELD_API_KEYS` takes precedence over the file's key list.
pub fn load_config() -> Result<Config> {
    let config_path = ProjectDirs::from("com", "mindmeld", "mindmeld")
        .map(|d| d.config_dir().join("mindmeld.toml"));

    let mut config = match &config_path {
        Some(path) if path.exists() => read_config(path)?,
        _ => Config::default(),
    };

    if let Ok(raw) = std::env::var(KEYS_ENV_VAR) {
        config.api_keys = split_keys(&raw);
    }

    Ok(config)
}

/// Read and parse a configuration file.
pub fn read_config(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;
    toml::from_str(&contents).with_context(|| format!("Failed to parse config from {:?}", path))
}

fn split_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_config_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_keys = [\"sk-a\", \"sk-b\"]").unwrap();

        let config = read_config(file.path()).unwrap();
        assert_eq!(config.api_keys, vec!["sk-a", "sk-b"]);
        assert_eq!(config.balance_url, DEFAULT_BALANCE_URL);
        assert_eq!(config.portrait_url, DEFAULT_PORTRAIT_URL);
    }

    #[test]
    fn test_read_config_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_keys = not-a-list").unwrap();

        assert!(read_config(file.path()).is_err());
    }

    #[test]
    fn test_read_config_missing_file_is_an_error() {
        assert!(read_config(Path::new("/nonexistent/mindmeld.toml")).is_err());
    }

    #[test]
    fn test_split_keys_trims_and_drops_empties() {
        assert_eq!(
            split_keys(" sk-a, sk-b ,, sk-c,"),
            vec!["sk-a", "sk-b", "sk-c"],
        );
        assert!(split_keys("").is_empty());
    }
}
