//! Base Table Cache
//! Loads the name table and department table once and shares them read-only.

use crate::data::{DataLoadError, DepartmentTable, NameTable};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

/// Where the two source files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub names_path: PathBuf,
    pub geo_path: PathBuf,
}

/// Both immutable base tables.
#[derive(Debug, Clone)]
pub struct BaseTables {
    pub names: NameTable,
    pub departments: DepartmentTable,
}

impl BaseTables {
    /// Load both tables; either failure fails the whole load.
    pub fn load(sources: &DataSources) -> Result<Self, DataLoadError> {
        let names = NameTable::load(&sources.names_path)?;
        let departments = DepartmentTable::load(&sources.geo_path)?;
        Ok(Self { names, departments })
    }
}

/// Modification times of the sources when they were loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceFingerprint {
    names_modified: Option<SystemTime>,
    geo_modified: Option<SystemTime>,
}

impl SourceFingerprint {
    fn of(sources: &DataSources) -> Self {
        let modified = |path: &PathBuf| fs::metadata(path).and_then(|m| m.modified()).ok();
        Self {
            names_modified: modified(&sources.names_path),
            geo_modified: modified(&sources.geo_path),
        }
    }
}

struct CachedTables {
    fingerprint: SourceFingerprint,
    tables: Arc<BaseTables>,
}

/// Load-once cache of the base tables, keyed by source identity.
///
/// The tables are rebuilt only after [`DataCache::invalidate`]; callers use
/// [`DataCache::is_stale`] to notice that a source file changed. The slot is
/// locked only to read or store tables, never while a load runs, so the
/// queries stay responsive during a load.
pub struct DataCache {
    sources: DataSources,
    slot: Mutex<Option<CachedTables>>,
    /// Serialises loads so concurrent callers read the files once.
    load_guard: Mutex<()>,
}

impl DataCache {
    pub fn new(sources: DataSources) -> Self {
        Self {
            sources,
            slot: Mutex::new(None),
            load_guard: Mutex::new(()),
        }
    }

    pub fn sources(&self) -> &DataSources {
        &self.sources
    }

    fn cached(&self) -> Option<Arc<BaseTables>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|cached| Arc::clone(&cached.tables))
    }

    /// Return the cached tables, loading them on first use.
    pub fn get_or_load(&self) -> Result<Arc<BaseTables>, DataLoadError> {
        if let Some(tables) = self.cached() {
            return Ok(tables);
        }

        let _loading = self.load_guard.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished loading while we waited
        if let Some(tables) = self.cached() {
            return Ok(tables);
        }

        let fingerprint = SourceFingerprint::of(&self.sources);
        let tables = Arc::new(BaseTables::load(&self.sources)?);
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedTables {
            fingerprint,
            tables: Arc::clone(&tables),
        });
        Ok(tables)
    }

    /// True when tables are cached and a source file changed since loading.
    pub fn is_stale(&self) -> bool {
        let current = SourceFingerprint::of(&self.sources);
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref()
            .is_some_and(|cached| cached.fingerprint != current)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the cached tables. Outstanding `Arc`s stay valid.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            log::info!("Invalidated cached base tables");
        }
    }

    pub fn reload(&self) -> Result<Arc<BaseTables>, DataLoadError> {
        self.invalidate();
        self.get_or_load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;
    use tempfile::TempDir;

    const NAMES: &str = "sexe;preusuel;annais;dpt;nombre\n1;PAUL;2000;75;3\n";
    const GEO: &str = r#"{"type":"FeatureCollection","features":[
        {"type":"Feature","properties":{"code":"75","nom":"Paris"},"geometry":null}
    ]}"#;

    fn touch_later(path: &PathBuf) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
    }

    fn sources(dir: &TempDir) -> DataSources {
        let names_path = dir.path().join("dpt2020.csv");
        let geo_path = dir.path().join("departements.geojson");
        fs::write(&names_path, NAMES).unwrap();
        fs::write(&geo_path, GEO).unwrap();
        DataSources {
            names_path,
            geo_path,
        }
    }

    #[test]
    fn test_get_or_load_returns_same_tables() {
        let dir = TempDir::new().unwrap();
        let cache = DataCache::new(sources(&dir));

        let first = cache.get_or_load().unwrap();
        let second = cache.get_or_load().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.names.len(), 1);
        assert_eq!(first.departments.len(), 1);
    }

    #[test]
    fn test_cached_tables_survive_source_changes_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let src = sources(&dir);
        let cache = DataCache::new(src.clone());
        let first = cache.get_or_load().unwrap();

        std::thread::sleep(Duration::from_millis(20));
        fs::write(
            &src.names_path,
            "sexe;preusuel;annais;dpt;nombre\n1;PAUL;2000;75;3\n2;LEA;2000;75;4\n",
        )
        .unwrap();

        assert!(Arc::ptr_eq(&first, &cache.get_or_load().unwrap()));

        let reloaded = cache.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &reloaded));
        assert_eq!(reloaded.names.len(), 2);
        assert_eq!(first.names.len(), 1);
    }

    #[test]
    fn test_missing_geo_file_fails_whole_load() {
        let dir = TempDir::new().unwrap();
        let mut src = sources(&dir);
        src.geo_path = dir.path().join("missing.geojson");
        let cache = DataCache::new(src);

        let err = cache.get_or_load().unwrap_err();

        assert!(matches!(err, DataLoadError::MissingFile(_)));
        assert!(!cache.is_loaded());
    }

    #[test]
    fn test_not_stale_before_load() {
        let dir = TempDir::new().unwrap();
        let cache = DataCache::new(sources(&dir));
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_stale_after_source_rewrite_until_reload() {
        let dir = TempDir::new().unwrap();
        let src = sources(&dir);
        let cache = DataCache::new(src.clone());
        cache.get_or_load().unwrap();
        assert!(!cache.is_stale());

        touch_later(&src.geo_path);
        assert!(cache.is_stale());

        cache.reload().unwrap();
        assert!(!cache.is_stale());
    }

    #[test]
    fn test_queries_do_not_wait_for_running_load() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(DataCache::new(sources(&dir)));

        // Hold the load guard so a load stays in progress
        let loading = cache.load_guard.lock().unwrap();
        let loader = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.get_or_load().map(|t| t.names.len()))
        };

        let (tx, rx) = channel();
        {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                let _ = tx.send((cache.is_stale(), cache.is_loaded()));
            });
        }
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok((false, false)));

        drop(loading);
        assert_eq!(loader.join().unwrap().unwrap(), 1);
        assert!(cache.is_loaded());
    }
}
