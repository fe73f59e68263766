use super::schema::LineupConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Finds and parses the YAML file behind [`LineupConfig`].
///
/// One file drives both subcommands: `build` reads `catalog` (tiered lineup, songs
/// per tier, API base) and writes to `files.playlist`; `import` reads `player`,
/// `playlist`, `timings` and `selectors`, and writes failures to
/// `files.failure_report`. Any section left out keeps its defaults, so an empty
/// file is valid.
pub struct ConfigLoader;

impl ConfigLoader {
    /// First existing of `./lineup.yaml` (next to the playlist file) and
    /// `~/.lineup/config.yaml`; built-in defaults when neither exists.
    pub async fn load_default() -> Result<LineupConfig, ConfigError> {
        let local_config = PathBuf::from("./lineup.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".lineup").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(LineupConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<LineupConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        // serde_yaml reads an empty document as unit, not as an empty map.
        let config: LineupConfig = if content.trim().is_empty() {
            LineupConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        tracing::debug!(
            path = %path.display(),
            playlist = %config.playlist.name,
            tiers = config.catalog.lineup.len(),
            "Loaded config"
        );
        Ok(config)
    }
}
