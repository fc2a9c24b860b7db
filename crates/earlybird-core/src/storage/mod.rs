mod config;

pub use config::{Config, LeaderboardConfig, RewardsConfig};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns `~/.config/earlybird[-dev]/` based on EARLYBIRD_ENV.
///
/// Set EARLYBIRD_ENV=dev to use development data directory.
///
/// # Errors
/// Returns [`ConfigError::NoConfigDir`] when the home directory is unknown, or
/// an I/O error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("EARLYBIRD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("earlybird-dev")
    } else {
        base_dir.join("earlybird")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
