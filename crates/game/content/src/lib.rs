//! Data-driven arena content and loaders.
//!
//! This crate reads static content from RON/TOML data files:
//! - Monster types and skills (data-driven via RON)
//! - Arena rules configuration (data-driven via TOML)
//!
//! Content seeds the runtime's catalog and never appears in battle or
//! tournament state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogContent, CatalogLoader, ConfigLoader, ContentFactory, LoadResult, MonsterTypeEntry,
};
