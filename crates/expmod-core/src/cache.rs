//! Persistent description cache.
//!
//! Maps `owner/name` to the description fetched for that repository. The
//! whole mapping is loaded once before a run and written back once after
//! it, as a single JSON object:
//! ```text
//! {
//!   "pkg/errors": "Simple error handling primitives for Go",
//!   "uber-go/zap": "Blazing fast, structured, leveled logging in Go."
//! }
//! ```
//! Entries never expire; `--clear-cache` is the only eviction.

use std::collections::HashMap;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ExpmodError, Result};

/// Environment variable overriding the cache file location.
pub const CACHE_ENV_KEY: &str = "EXPMOD_CACHE";

/// An in-memory snapshot of the cache file.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Location of the cache file.
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl CacheStore {
    /// An empty store that will be saved to `path`.
    pub fn new(path: PathBuf) -> Self {
        CacheStore {
            path,
            entries: HashMap::new(),
        }
    }

    /// Cache file location: `$EXPMOD_CACHE`, else `<user cache dir>/expmod/cache.json`.
    pub fn default_path() -> Result<PathBuf> {
        cache_path_from(std::env::var_os(CACHE_ENV_KEY), dirs::cache_dir())
    }

    /// Load the store at `path`. A missing file is an empty store.
    pub fn load(path: PathBuf) -> Result<Self> {
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cache file yet");
                return Ok(CacheStore::new(path));
            }
            Err(e) => {
                return Err(ExpmodError::Cache {
                    path,
                    detail: format!("reading cache: {e}"),
                })
            }
        };

        let entries: HashMap<String, String> =
            serde_json::from_str(&data).map_err(|e| ExpmodError::Cache {
                path: path.clone(),
                detail: format!("decoding cache: {e}"),
            })?;

        debug!(path = %path.display(), entries = entries.len(), "cache loaded");
        Ok(CacheStore { path, entries })
    }

    /// Load the store at `path`, starting empty if it can't be read.
    pub fn load_or_default(path: PathBuf) -> Self {
        match CacheStore::load(path.clone()) {
            Ok(store) => store,
            Err(e) => {
                warn!(error = %e, "can't load cache, starting empty");
                CacheStore::new(path)
            }
        }
    }

    /// Write the whole store, replacing the previous file atomically.
    pub fn save(&self) -> Result<()> {
        let cache_error = |detail: String| ExpmodError::Cache {
            path: self.path.clone(),
            detail,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| cache_error(format!("creating cache dir: {e}")))?;

        let data = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| cache_error(format!("encoding cache: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| cache_error(format!("creating temporary file: {e}")))?;
        tmp.write_all(&data)
            .map_err(|e| cache_error(format!("writing cache: {e}")))?;
        tmp.persist(&self.path)
            .map_err(|e| cache_error(format!("replacing cache: {e}")))?;

        debug!(path = %self.path.display(), entries = self.entries.len(), "cache saved");
        Ok(())
    }

    /// Get the cached description for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Check if `key` is cached.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store a description, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, description: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), description.into())
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached descriptions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries.
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }
}

fn cache_path_from(env_value: Option<OsString>, cache_dir: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = env_value.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    cache_dir
        .map(|dir| dir.join("expmod").join("cache.json"))
        .ok_or_else(|| ExpmodError::CacheLocation {
            detail: format!("no user cache directory and {CACHE_ENV_KEY} is not set"),
        })
}
