use crate::errors::AnalysisResult;
use crate::storage::KeyValueStore;
use crate::types::AnalysisRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Fixed storage key per analysis domain. Each key holds a JSON array of
/// `AnalysisRecord` values filtered client-side by case.
pub mod keys {
    pub const DOCUMENTS: &str = "document-analyses";
    pub const IMAGES: &str = "image-analyses";
    pub const AUDIO: &str = "audio-analyses";
    pub const LINKS: &str = "link-analyses";
    pub const REPORTS: &str = "case-reports";

    pub const ALL: &[&str] = &[DOCUMENTS, IMAGES, AUDIO, LINKS, REPORTS];
}

/// Persists analysis records, one array per domain key.
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Insert or replace the record for `(case_id, filename)` under the given
    /// domain key. Reprocessing a file replaces its earlier record instead of
    /// appending a duplicate.
    pub fn upsert<T>(&self, key: &str, record: AnalysisRecord<T>) -> AnalysisResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut records: Vec<AnalysisRecord<T>> = self.load(key);
        match records
            .iter()
            .position(|existing| {
                existing.case_id == record.case_id && existing.filename == record.filename
            }) {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
        self.storage.set(key, &serde_json::to_string(&records)?)
    }

    /// All records under the given domain key that belong to a case.
    pub fn for_case<T: DeserializeOwned>(
        &self,
        key: &str,
        case_id: &str,
    ) -> Vec<AnalysisRecord<T>> {
        self.load(key)
            .into_iter()
            .filter(|record| record.case_id == case_id)
            .collect()
    }

    /// Bulk delete of every domain key. The only delete operation; records
    /// are otherwise replaced through `upsert`.
    pub fn clear(&self) -> AnalysisResult<()> {
        for key in keys::ALL {
            self.storage.remove(key)?;
        }
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<AnalysisRecord<T>> {
        let Some(raw) = self.storage.get(key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("stored records under '{key}' are unreadable, starting empty: {err}");
                Vec::new()
            }
        }
    }
}
