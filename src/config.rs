use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::launch::{DEFAULT_DWELL, LaunchPolicy};

pub const APP_DIR_NAME : &str = "minelauncher";
const CONFIG_FILE_NAME : &str = "launcher.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no platform directory for {0}")]
    NoPlatformDir(&'static str),
}

/// Build-level choices. Everything the user can tweak at runtime lives in
/// the appearance settings instead.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LauncherConfig {
    pub launch_policy: LaunchPolicy,
    pub launch_dwell_ms: u64,
    /// Directory the `/games/...` paths of the static policy resolve under.
    pub games_root: PathBuf,
    pub show_login: bool,
    pub storage_dir: Option<PathBuf>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            launch_policy: LaunchPolicy::default(),
            launch_dwell_ms: DEFAULT_DWELL.as_millis() as u64,
            games_root: PathBuf::from("."),
            show_login: false,
            storage_dir: None,
        }
    }
}

impl LauncherConfig {
    pub fn launch_dwell(&self) -> Duration {
        Duration::from_millis(self.launch_dwell_ms)
    }

    /// Explicit `storage_dir`, else `<data dir>/minelauncher`.
    pub fn storage_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .ok_or(ConfigError::NoPlatformDir("data")),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoPlatformDir("config"))
}

/// A missing file is not an error: it just means every default applies.
pub fn load_config(path: impl AsRef<Path>) -> Result<LauncherConfig, ConfigError> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LauncherConfig::default()),
        Err(source) => return Err(ConfigError::Io { path: path.to_path_buf(), source }),
    };
    toml::from_str(&text).map_err(|source| ConfigError::Toml { path: path.to_path_buf(), source })
}

pub fn load_or_default() -> LauncherConfig {
    let loaded = default_config_path().and_then(|path| {
        info!("Reading config from {}", path.display());
        load_config(path)
    });
    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("Using default config: {}", e);
            LauncherConfig::default()
        }
    }
}
