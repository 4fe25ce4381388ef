//! Command-line command handlers for skycam.
//!
//! Each command is implemented in its own submodule. Helpers shared by more
//! than one command live here.

pub mod colour;
pub mod help;
pub mod simulate;
pub mod sun;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::{self, Config};
use crate::time_source;

/// Load the configuration and announce where it came from.
pub(crate) fn load_config(show: bool) -> Result<Config> {
    let (config, path) = config::load()?;
    if show {
        let path = path.as_deref().map(config::loading::private_path);
        config.log_config(path.as_deref());
    }
    Ok(config)
}

/// `--at` as a local instant, or the current time.
pub(crate) fn resolve_instant(at: Option<&str>) -> Result<DateTime<Local>> {
    match at {
        Some(text) => time_source::parse_datetime(text)
            .map_err(|e| anyhow::anyhow!("Invalid time '{}': {}", text, e)),
        None => Ok(time_source::now()),
    }
}
