//! Configuration for plotmark
//!
//! Settings live in a TOML file, by default `~/.plotmark/config.toml`
//! (`%LOCALAPPDATA%\plotmark\config.toml` on Windows). The location can be
//! overridden with `--config` or the `PLOTMARK_CONFIG` environment variable. A
//! missing file is not an error; every setting has a default.
//!
//! ```toml
//! file_prefix = "plotmark"
//!
//! [cache]
//! enabled = true
//! location = "filesystem"
//! directory = "attachments/graphs"   # relative paths resolve against the caller's root
//!
//! [renderer]
//! origin = "app://plotmark"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{CONFIG_ENV_VAR, DEFAULT_FILE_PREFIX, DEFAULT_RENDERER_ORIGIN};

/// Where rendered images are cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheLocation {
    /// Process-lifetime in-memory map
    #[default]
    Memory,
    /// One file per entry in a directory
    Filesystem,
}

/// Render cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether rendered images are cached at all.
    pub enabled: bool,

    /// Which backend holds cached images.
    pub location: CacheLocation,

    /// Cache directory for the filesystem backend.
    ///
    /// Absolute paths are used verbatim, relative paths are resolved against the
    /// root supplied with each render request, and when unset the platform
    /// temporary directory is used. The directory is never created by plotmark.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            location: CacheLocation::Memory,
            directory: None,
        }
    }
}

/// Settings for the external renderer channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Origin that completion messages must carry to be accepted.
    pub origin: String,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_RENDERER_ORIGIN.to_string(),
        }
    }
}

/// Top-level plotmark settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix of cache file names: `<prefix>-graph-<fingerprint>.png`.
    pub file_prefix: String,

    pub cache: CacheSettings,

    pub renderer: RendererSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            cache: CacheSettings::default(),
            renderer: RendererSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the default location, or defaults if the file is absent.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load settings from an explicit path, falling back to `PLOTMARK_CONFIG`
    /// and then the default location.
    ///
    /// A missing file yields [`Settings::default`].
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::resolve_path()?,
        };

        if fs::try_exists(&path).await.unwrap_or(false) {
            Self::load_from(&path).await
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Write settings as TOML, creating the parent directory if needed.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Config path from `PLOTMARK_CONFIG`, or the default path.
    pub fn resolve_path() -> Result<PathBuf> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::default_path(),
        }
    }

    /// Default config file location for this platform.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("plotmark")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".plotmark")
        };

        Ok(config_dir.join("config.toml"))
    }
}
