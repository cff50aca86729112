//! `expmod --clear-cache`: forget every stored description.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use expmod_core::CacheStore;

pub fn clear(path: &Path, out: &mut impl Write) -> Result<()> {
    let mut store = CacheStore::load_or_default(path.to_path_buf());
    store.clear();
    store
        .save()
        .with_context(|| format!("clearing cache {}", path.display()))?;
    writeln!(out, "cache cleared")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let mut store = CacheStore::new(path.clone());
        store.insert("pkg/errors", "Simple error handling primitives");
        store.save().unwrap();

        let mut out = Vec::new();
        clear(&path, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "cache cleared\n");
        assert!(CacheStore::load(path).unwrap().is_empty());
    }

    #[test]
    fn clear_without_a_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        let mut out = Vec::new();
        clear(&path, &mut out).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn clear_replaces_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "not json").unwrap();

        clear(&path, &mut Vec::new()).unwrap();
        assert!(CacheStore::load(path).unwrap().is_empty());
    }
}
