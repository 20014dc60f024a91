use editbridge_engine::editcheck::EditCheckOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editcheck: EditCheckSection,
}

/// `[editcheck]` section: tuning for the added-content reference check.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditCheckSection {
    /// Minimum inserted length before the editor nudges for a citation.
    pub minimum_characters: usize,
    /// Marker types counted as citations in addition to the built-in one.
    pub reference_types: Vec<String>,
}

impl Default for EditCheckSection {
    fn default() -> Self {
        let defaults = EditCheckOptions::default();
        Self {
            minimum_characters: defaults.minimum_characters,
            reference_types: vec![],
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/editbridge");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine options for the edit check: configured types extend the
    /// built-in reference marker type rather than replacing it.
    pub fn editcheck_options(&self) -> EditCheckOptions {
        let mut options = EditCheckOptions {
            minimum_characters: self.editcheck.minimum_characters,
            ..EditCheckOptions::default()
        };
        for custom in &self.editcheck.reference_types {
            if !options.reference_types.contains(custom) {
                options.reference_types.push(custom.clone());
            }
        }
        options
    }
}
