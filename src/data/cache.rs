//! Load Cache
//! Holds the last loaded table, keyed by file path and modification time.

use crate::data::{DataLoader, LoaderError};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Identity of a loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl CacheKey {
    /// Key for the file currently at `path`, `None` if it does not exist.
    pub fn for_path(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            modified: metadata.modified().ok(),
        })
    }
}

/// Single-entry memo of the most recent successful load.
#[derive(Default)]
pub struct LoadCache {
    entry: Option<(CacheKey, DataFrame)>,
    generation: u64,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented every time a new table is stored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cached table for `path`, loading it with `loader` when stale.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        loader: &DataLoader,
    ) -> Result<DataFrame, LoaderError> {
        self.get_or_load_with(path, |p| loader.load(p))
    }

    /// Like [`get_or_load`](Self::get_or_load) with a custom load function.
    pub fn get_or_load_with<F>(&mut self, path: &Path, load: F) -> Result<DataFrame, LoaderError>
    where
        F: FnOnce(&Path) -> Result<DataFrame, LoaderError>,
    {
        let Some(key) = CacheKey::for_path(path) else {
            if self.entry.take().is_some() {
                info!("{} disappeared, dropping cached table", path.display());
            }
            return Err(LoaderError::NotFound(path.to_path_buf()));
        };

        if let Some((cached_key, df)) = &self.entry {
            if *cached_key == key {
                debug!("Cache hit for {}", path.display());
                return Ok(df.clone());
            }
        }

        let df = load(path)?;
        self.entry = Some((key, df.clone()));
        self.generation += 1;
        Ok(df)
    }

    /// Forget the cached table so the next access reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    fn table() -> DataFrame {
        df!("region" => ["North"]).unwrap()
    }

    #[test]
    fn missing_file_is_not_cached() {
        let mut cache = LoadCache::new();
        let calls = Cell::new(0);
        let result = cache.get_or_load_with(Path::new("no/such/vendedores.xlsx"), |_| {
            calls.set(calls.get() + 1);
            Ok(table())
        });

        assert!(matches!(result, Err(LoaderError::NotFound(_))));
        assert_eq!(calls.get(), 0);
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn same_file_loads_once() {
        // Cargo.toml is always present and unchanged during the test run.
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let mut cache = LoadCache::new();
        let calls = Cell::new(0);

        for _ in 0..3 {
            let df = cache
                .get_or_load_with(&path, |_| {
                    calls.set(calls.get() + 1);
                    Ok(table())
                })
                .unwrap();
            assert_eq!(df.height(), 1);
        }

        assert_eq!(calls.get(), 1);
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let mut cache = LoadCache::new();
        let calls = Cell::new(0);
        let mut load = || {
            cache
                .get_or_load_with(&path, |_| {
                    calls.set(calls.get() + 1);
                    Ok(table())
                })
                .unwrap()
        };
        load();
        load();
        drop(load);

        cache.invalidate();
        cache
            .get_or_load_with(&path, |_| {
                calls.set(calls.get() + 1);
                Ok(table())
            })
            .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(cache.generation(), 2);
    }

    #[test]
    fn failed_load_does_not_bump_generation() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let mut cache = LoadCache::new();
        cache.get_or_load_with(&path, |_| Ok(table())).unwrap();
        cache.invalidate();

        let result =
            cache.get_or_load_with(&path, |p| Err(LoaderError::UnsupportedFormat(p.into())));
        assert!(result.is_err());
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn rewritten_file_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendedores.csv");
        fs::write(&path, "region\nNorth\n").unwrap();

        let mut cache = LoadCache::new();
        let calls = Cell::new(0);
        let load = |cache: &mut LoadCache| {
            cache
                .get_or_load_with(&path, |p| {
                    calls.set(calls.get() + 1);
                    let region = fs::read_to_string(p).unwrap();
                    Ok(df!("region" => [region.lines().nth(1).unwrap_or_default()]).unwrap())
                })
                .unwrap()
        };

        load(&mut cache);
        load(&mut cache);
        assert_eq!(calls.get(), 1);

        let first_mtime = fs::metadata(&path).unwrap().modified().unwrap();
        fs::write(&path, "region\nSouth\n").unwrap();
        fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(first_mtime + Duration::from_secs(5))
            .unwrap();

        let df = load(&mut cache);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.generation(), 2);
        assert_eq!(
            df.column("region").unwrap().str().unwrap().get(0),
            Some("South")
        );
    }

    #[test]
    fn key_tracks_modification_time() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let key = CacheKey::for_path(&path).unwrap();
        let stale = CacheKey {
            modified: key
                .modified
                .map(|t| t + Duration::from_secs(1))
                .or(Some(SystemTime::UNIX_EPOCH)),
            ..key.clone()
        };
        assert_ne!(key, stale);
        assert!(CacheKey::for_path(Path::new("no/such/file")).is_none());
    }
}
