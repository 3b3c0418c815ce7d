//! Content pipeline configuration

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::Result;

/// Where content lives on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory scanned for source files
    pub asset_root: PathBuf,
    /// RON file the asset registry is persisted to
    pub registry_file: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self::with_asset_root("assets")
    }
}

impl ContentConfig {
    /// Registry file name used by [`with_asset_root`](Self::with_asset_root)
    pub const REGISTRY_FILE_NAME: &'static str = "asset_registry.ron";

    /// Configuration rooted at `root`, registry file inside it
    pub fn with_asset_root(root: impl Into<PathBuf>) -> Self {
        let asset_root = root.into();
        let registry_file = asset_root.join(Self::REGISTRY_FILE_NAME);
        Self { asset_root, registry_file }
    }

    /// Read a configuration from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    /// Write the configuration as RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
