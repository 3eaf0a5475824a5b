use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::domain::{Record, RecordId};
use super::repository::{Repository, RepositoryError};

/// Process-local repository used by the API service and the test suites.
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    records: Arc<Mutex<BTreeMap<RecordId, T>>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl<T: Record> MemoryRepository<T> {
    pub fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn key_taken<T: Record>(records: &BTreeMap<RecordId, T>, record: &T) -> Option<String> {
    let key = record.unique_key()?;
    records
        .values()
        .any(|existing| {
            existing.id() != record.id() && existing.unique_key().as_deref() == Some(key.as_str())
        })
        .then_some(key)
}

impl<T: Record> Repository<T> for MemoryRepository<T> {
    fn insert(&self, record: T) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(record.id()) {
            return Err(RepositoryError::Conflict);
        }
        if let Some(key) = key_taken(&guard, &record) {
            return Err(RepositoryError::DuplicateKey(key));
        }
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: T) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(record.id()) {
            return Err(RepositoryError::NotFound);
        }
        if let Some(key) = key_taken(&guard, &record) {
            return Err(RepositoryError::DuplicateKey(key));
        }
        guard.insert(record.id().clone(), record.clone());
        Ok(record)
    }

    fn remove(&self, id: &RecordId) -> Result<T, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<T>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}
