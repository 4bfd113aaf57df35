use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::file_system::{
    delete_file, list_files_with_extension, read_json_file, write_json_file,
};

/// A record persisted as `<key>.json` inside a [`JsonRecordStore`] directory.
pub trait StoredRecord: Clone + Serialize + DeserializeOwned + Send + Sync {
    fn record_key(&self) -> &str;
}

/// Directory of JSON documents, one file per record, fronted by an in-memory cache.
///
/// The cache is filled from disk on first access. All mutations hold the cache lock
/// while touching the filesystem, so writers to the same store are serialized.
/// Record keys are only turned into paths when the record is being written or
/// is already present in the cache.
pub struct JsonRecordStore<T: StoredRecord> {
    dir: PathBuf,
    cache: Mutex<Option<HashMap<String, T>>>,
}

impl<T: StoredRecord> JsonRecordStore<T> {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            cache: Mutex::new(None),
        }
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    async fn load_from_disk(&self) -> Result<HashMap<String, T>, DomainError> {
        let files = list_files_with_extension(&self.dir, "json").await?;
        let mut records = HashMap::with_capacity(files.len());

        for file_path in files {
            match read_json_file::<T>(&file_path).await {
                Ok(record) => {
                    records.insert(record.record_key().to_string(), record);
                }
                Err(e) => {
                    tracing::error!("Failed to load record from {:?}: {}", file_path, e);
                }
            }
        }

        tracing::debug!("Loaded {} records from {:?}", records.len(), self.dir);
        Ok(records)
    }

    /// Runs `f` against the loaded cache while holding the lock.
    async fn with_cache<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, T>) -> R,
    ) -> Result<R, DomainError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load_from_disk().await?);
        }
        let cache = guard.get_or_insert_with(HashMap::new);
        Ok(f(cache))
    }

    pub async fn all(&self) -> Result<Vec<T>, DomainError> {
        self.with_cache(|cache| cache.values().cloned().collect()).await
    }

    pub async fn get(&self, key: &str) -> Result<Option<T>, DomainError> {
        self.with_cache(|cache| cache.get(key).cloned()).await
    }

    pub async fn find(&self, predicate: impl Fn(&T) -> bool) -> Result<Option<T>, DomainError> {
        self.with_cache(|cache| cache.values().find(|record| predicate(*record)).cloned())
            .await
    }

    pub async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Result<Vec<T>, DomainError> {
        self.with_cache(|cache| {
            cache
                .values()
                .filter(|record| predicate(*record))
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn contains(&self, key: &str) -> Result<bool, DomainError> {
        self.with_cache(|cache| cache.contains_key(key)).await
    }

    pub async fn len(&self) -> Result<usize, DomainError> {
        self.with_cache(|cache| cache.len()).await
    }

    pub async fn put(&self, record: &T) -> Result<(), DomainError> {
        self.put_many(std::slice::from_ref(record)).await
    }

    pub async fn put_many(&self, records: &[T]) -> Result<(), DomainError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load_from_disk().await?);
        }
        let cache = guard.get_or_insert_with(HashMap::new);

        for record in records {
            write_json_file(&self.record_path(record.record_key()), record).await?;
            cache.insert(record.record_key().to_string(), record.clone());
        }

        Ok(())
    }

    /// Removes every record matching `predicate`, returning how many were removed.
    pub async fn remove_where(&self, predicate: impl Fn(&T) -> bool) -> Result<usize, DomainError> {
        let mut guard = self.cache.lock().await;
        if guard.is_none() {
            *guard = Some(self.load_from_disk().await?);
        }
        let cache = guard.get_or_insert_with(HashMap::new);

        let keys: Vec<String> = cache
            .iter()
            .filter(|(_, record)| predicate(*record))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys {
            delete_file(&self.record_path(key)).await?;
            cache.remove(key);
        }

        Ok(keys.len())
    }

    pub async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        let removed = self.remove_where(|record| record.record_key() == key).await?;
        Ok(removed > 0)
    }
}
