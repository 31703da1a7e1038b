//! User preferences and application paths

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::command::history::DEFAULT_HISTORY_LIMIT;
use crate::session::SessionOrder;
use crate::theme::{TOKYO_NIGHT, Theme};

const CONFIG_FILE: &str = "config.json";

/// Last known terminal size, in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub width: u16,
    pub height: u16,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self { width: 80, height: 24 }
    }
}

/// Persisted user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selected theme name
    pub theme: String,

    /// Where folder files live; defaults to `<data dir>/folders`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folders_dir: Option<PathBuf>,

    /// Terminal size at the last shutdown
    pub window: WindowGeometry,

    /// Card order used by `test` when none is given
    pub session_order: SessionOrder,

    /// Number of command lines kept in the history
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: TOKYO_NIGHT.name.to_string(),
            folders_dir: None,
            window: WindowGeometry::default(),
            session_order: SessionOrder::AsDisplayed,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Load preferences, falling back to defaults on any problem
    ///
    /// A missing file is normal on first start. An unreadable or malformed
    /// one is logged and ignored so a bad preferences file never blocks
    /// startup.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences at {:?}, using defaults", path);
            return Self::default();
        }

        let parsed = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences from {:?}", path))
            .and_then(|contents| {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse preferences in {:?}", path))
            });

        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default preferences", e);
                Self::default()
            }
        }
    }

    /// Save preferences, failing on any I/O or serialization problem
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Preferences file: inside `data_dir` when one was chosen, else the platform config dir
    pub fn config_path(data_dir: Option<&Path>) -> Result<PathBuf> {
        match data_dir {
            Some(dir) => Ok(dir.join(CONFIG_FILE)),
            None => Ok(project_dirs("config")?.config_dir().join(CONFIG_FILE)),
        }
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        Ok(project_dirs("data")?.data_dir().to_path_buf())
    }

    /// Folders directory, honouring the override
    pub fn resolve_folders_dir(&self, data_dir: &Path) -> PathBuf {
        self.folders_dir.clone().unwrap_or_else(|| data_dir.join("folders"))
    }

    /// The selected theme, or the default when the name is unknown
    pub fn active_theme(&self) -> Theme {
        Theme::named(&self.theme).unwrap_or_else(|| {
            warn!("Unknown theme '{}', using {}", self.theme, TOKYO_NIGHT.name);
            Theme::default()
        })
    }
}

fn project_dirs(kind: &str) -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "knowitall")
        .with_context(|| format!("Failed to determine {} directory", kind))
}
