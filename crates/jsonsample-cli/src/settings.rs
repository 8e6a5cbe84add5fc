use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file picked up from the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "jsonsample.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed seed for every run; a fresh one is drawn when unset.
    pub seed: Option<u64>,
    /// Indent with this many spaces instead of tabs.
    pub indent_spaces: Option<usize>,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Directory receiving JSON log lines; stderr is used when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            dir: None,
        }
    }
}

impl Settings {
    /// Indentation unit for rendered documents.
    pub fn indent_unit(&self) -> String {
        match self.indent_spaces {
            Some(spaces) => " ".repeat(spaces),
            None => "\t".to_string(),
        }
    }
}

/// Loads `path`, or `jsonsample.toml` in the working directory when present.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => read_settings(path),
        None => {
            let default_path = Path::new(DEFAULT_SETTINGS_FILE);
            if default_path.exists() {
                read_settings(default_path)
            } else {
                Ok(Settings::default())
            }
        }
    }
}

pub fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn encode_settings(settings: &Settings) -> Result<String, SettingsError> {
    Ok(toml::to_string_pretty(settings)?)
}
