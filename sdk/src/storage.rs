use crate::errors::AnalysisResult;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Plain key-value persistence of JSON strings.
///
/// Reads report failure as `None`: the storage layer swallows and logs read
/// errors so callers can fall back to defaults. Writes surface errors.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> AnalysisResult<()>;
    fn remove(&self, key: &str) -> AnalysisResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> AnalysisResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> AnalysisResult<()> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> AnalysisResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> AnalysisResult<()> {
        (**self).remove(key)
    }
}

/// One file per key under a directory. Writes go through a temp file and a
/// rename so a crash mid-write cannot leave a torn value.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!("failed to read stored value for '{key}': {err}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> AnalysisResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, value)?;
        std::fs::rename(temp_path, path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> AnalysisResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and demo sessions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AnalysisResult<()> {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> AnalysisResult<()> {
        if let Ok(mut map) = self.inner.lock() {
            map.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrip_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("missing"), None);
        store.set("api-configuration", r#"{"value":1}"#).unwrap();
        assert_eq!(
            store.get("api-configuration").as_deref(),
            Some(r#"{"value":1}"#)
        );

        store.remove("api-configuration").unwrap();
        assert_eq!(store.get("api-configuration"), None);
        // removing a key twice is not an error
        store.remove("api-configuration").unwrap();
    }

    #[test]
    fn memory_store_overwrites_wholesale() {
        let store = MemoryStore::new();
        store.set("key", "first").unwrap();
        store.set("key", "second").unwrap();
        assert_eq!(store.get("key").as_deref(), Some("second"));
    }
}
