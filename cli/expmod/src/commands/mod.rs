pub mod cache;
pub mod describe;

use std::path::PathBuf;

use anyhow::Result;

use expmod_core::CacheStore;

use crate::settings::Settings;

/// The cache file this run reads and writes.
pub fn cache_path(settings: &Settings) -> Result<PathBuf> {
    match &settings.cache_file {
        Some(path) => Ok(path.clone()),
        None => Ok(CacheStore::default_path()?),
    }
}
