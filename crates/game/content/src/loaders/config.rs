//! Arena configuration loader.

use std::path::Path;

use arena_core::ArenaConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for arena configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`ArenaConfig::default`].
    pub fn load(path: &Path) -> LoadResult<ArenaConfig> {
        let content = read_file(path)?;
        let config: ArenaConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_level == 0 {
            anyhow::bail!("max_level must be at least 1");
        }
        Ok(config)
    }
}
