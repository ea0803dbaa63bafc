//! Configuration schema for setup-texlive
//!
//! Configuration is stored at `~/.config/setup-texlive/config.toml`. Every
//! key is optional; run inputs (packages, cache version, ...) are not part
//! of the file and come from the command line or `INPUT_*` variables.

use crate::mirror::Region;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Mirror catalog and repository settings
    pub mirror: MirrorConfig,

    /// Installation layout
    pub install: InstallConfig,

    /// Snapshot store settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Mirror selection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Mirror status catalog (JSON)
    pub catalog_url: String,

    /// Continent whose mirrors are considered
    pub continent: String,

    /// Country whose mirrors are considered
    pub country: String,

    /// Where the installer is downloaded from when no mirror was resolved
    pub default_repository: String,
}

impl MirrorConfig {
    pub fn region(&self) -> Region {
        Region {
            continent: self.continent.clone(),
            country: self.country.clone(),
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        let region = Region::default();
        Self {
            catalog_url: "https://zauguin.github.io/texlive-mirrors/mirrors.v2.json".to_string(),
            continent: region.continent,
            country: region.country,
            default_repository: "https://mirrors.ctan.org/systems/texlive/tlnet".to_string(),
        }
    }
}

/// Installation layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// TEXDIR of the installation (default: `~/texlive`)
    pub root: Option<PathBuf>,

    /// Scratch space for the installer (default: system temp dir)
    pub temp_dir: Option<PathBuf>,
}

/// Snapshot store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding snapshot archives (default: user cache dir)
    pub dir: Option<PathBuf>,
}
