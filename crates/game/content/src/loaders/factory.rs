//! Content factory for loading everything from a data directory.

use std::path::{Path, PathBuf};

use arena_core::ArenaConfig;

use crate::loaders::{CatalogContent, CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── arena.toml
/// └── catalog.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data directory bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load arena rules from `arena.toml`.
    pub fn load_config(&self) -> LoadResult<ArenaConfig> {
        ConfigLoader::load(&self.data_dir.join("arena.toml"))
    }

    /// Load monster types and skills from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<CatalogContent> {
        CatalogLoader::load(&self.data_dir.join("catalog.ron"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
