//! CLI configuration file support.
//!
//! Resolution order for the store path and the caller token is:
//! command-line flag, then environment variable, then the config file,
//! then the built-in default. The config file is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GatelinkConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub auth: AuthSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSection {
    /// Path to the SQLite database
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AuthSection {
    /// Token presented with mutating operations
    pub token: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("gatelink.db"))
}

/// Read the config file at `path`; a missing file yields the defaults.
pub fn load(path: &Path) -> anyhow::Result<GatelinkConfig> {
    if !path.exists() {
        return Ok(GatelinkConfig::default());
    }
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("gatelink"));
        }
    }
    Ok(home_dir()?.join(".config").join("gatelink"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("gatelink"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("gatelink"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load(Path::new("/nonexistent/gatelink/config.toml"))
            .expect("missing config should load as defaults");
        assert!(config.store.path.is_none());
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_partial_config_parses() {
        let config: GatelinkConfig = toml::from_str(
            r#"
            [store]
            path = "/var/lib/gatelink/gatelink.db"
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(
            config.store.path.as_deref(),
            Some("/var/lib/gatelink/gatelink.db")
        );
        assert!(config.auth.token.is_none());
    }
}
