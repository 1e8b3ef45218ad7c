use crate::error::{ClanopsError, Result};
use clanops_render::{AssetConfig, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level settings. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Value table JSON; the `--values` flag takes precedence.
    pub values: Option<PathBuf>,
    pub assets: AssetConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ClanopsError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ClanopsError::ConfigJson {
            path: path.display().to_string(),
            source,
        })
    }
}
