//! Configuration loading functionality.
//!
//! Resolves the config path (default or `--config` directory), reads and
//! parses the TOML file and validates the result.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::Config;
use super::validation::validate_config;

const CONFIG_FILE_NAME: &str = "skycam.toml";

/// Global configuration directory, set once at startup
static CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Set the configuration directory for the current process.
///
/// Can only be called once, typically at startup.
pub fn set_config_dir(dir: Option<String>) -> Result<()> {
    CONFIG_DIR
        .set(dir.map(PathBuf::from))
        .map_err(|_| anyhow::anyhow!("Configuration directory already set"))
}

fn get_custom_config_dir() -> Option<PathBuf> {
    CONFIG_DIR.get().and_then(|d| d.clone())
}

/// Path of `skycam.toml`, whether or not it exists.
pub fn get_config_path() -> Result<PathBuf> {
    if let Some(custom_dir) = get_custom_config_dir() {
        return Ok(custom_dir.join(CONFIG_FILE_NAME));
    }

    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("skycam").join(CONFIG_FILE_NAME))
}

/// Load configuration using automatic path detection.
///
/// A missing file in the default location yields the built-in defaults. A
/// missing file in a directory given with `--config` is an error.
pub fn load() -> Result<(Config, Option<PathBuf>)> {
    let config_path = get_config_path()?;

    if !config_path.exists() {
        if get_custom_config_dir().is_some() {
            anyhow::bail!(
                "Configuration file not found at {}",
                private_path(&config_path)
            );
        }
        return Ok((Config::default(), None));
    }

    let config = load_from_path(&config_path)?;
    Ok((config, Some(config_path)))
}

/// Load and validate configuration from a specific file.
pub fn load_from_path(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Configuration file not found at {}", private_path(path));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", private_path(path)))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", private_path(path)))?;

    validate_config(&config)
        .with_context(|| format!("Invalid configuration in {}", private_path(path)))?;

    Ok(config)
}

/// Path for display, with the home directory shortened to `~`.
pub fn private_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(relative) = path.strip_prefix(&home)
    {
        return format!("~/{}", relative.display());
    }
    path.display().to_string()
}
