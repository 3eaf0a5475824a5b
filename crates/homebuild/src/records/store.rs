use std::sync::{Mutex, MutexGuard, PoisonError};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{info, warn};

use super::domain::{Record, RecordId, RecordKind, ValidationError};
use super::repository::RepositoryError;
use super::table::{Page, PageQuery, Table};

/// CRUD facade over a [`Table`], with hooks for cross-collection integrity checks.
///
/// Services implement this once per record type they own; the provided methods run the
/// hooks so the HTTP layer never bypasses them.
pub trait RecordStore<T: Record>: Send + Sync {
    fn table(&self) -> &Table<T>;

    /// Runs before a created or revised record is written.
    fn guard_write(&self, _record: &T) -> Result<(), RecordError> {
        Ok(())
    }

    /// Runs before a record is removed.
    fn guard_delete(&self, _record: &T) -> Result<(), RecordError> {
        Ok(())
    }

    /// Lock shared by every store whose guards read another collection. It is held from
    /// the guard through the write so a concurrent write cannot invalidate the check.
    fn integrity_lock(&self) -> Option<&Mutex<()>> {
        None
    }

    fn create(&self, draft: T::Draft) -> Result<T, RecordError> {
        let _integrity = hold(self.integrity_lock());
        let record = self.table().prepare(draft)?;
        self.guard_write(&record)?;
        let stored = self.table().insert(record)?;
        info!(kind = T::KIND.label(), id = %stored.id(), "record created");
        Ok(stored)
    }

    fn update(&self, id: &RecordId, draft: T::Draft) -> Result<T, RecordError> {
        let _integrity = hold(self.integrity_lock());
        let record = self.table().revise(id, draft)?;
        self.guard_write(&record)?;
        let stored = self.table().store(record)?;
        info!(kind = T::KIND.label(), id = %stored.id(), "record updated");
        Ok(stored)
    }

    fn delete(&self, id: &RecordId) -> Result<T, RecordError> {
        let _integrity = hold(self.integrity_lock());
        let record = self.table().get(id)?;
        if let Err(err) = self.guard_delete(&record) {
            warn!(kind = T::KIND.label(), %id, error = %err, "delete rejected");
            return Err(err);
        }
        let removed = self.table().remove(id)?;
        info!(kind = T::KIND.label(), %id, "record deleted");
        Ok(removed)
    }

    fn get(&self, id: &RecordId) -> Result<T, RecordError> {
        self.table().get(id)
    }

    fn page(&self, query: &PageQuery) -> Result<Page<T>, RecordError> {
        self.table().page(query)
    }

    fn all(&self) -> Result<Vec<T>, RecordError> {
        self.table().all()
    }
}

fn hold(lock: Option<&Mutex<()>>) -> Option<MutexGuard<'_, ()>> {
    // The guarded data lives in the repositories, so a poisoned lock is still usable.
    lock.map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Error raised by record services.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} '{id}' not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("{kind} with key '{key}' already exists")]
    Duplicate { kind: RecordKind, key: String },
    #[error("{kind} '{id}' is still referenced by {} record(s)", .referenced_by.len())]
    InUse {
        kind: RecordKind,
        id: RecordId,
        referenced_by: Vec<RecordId>,
    },
    #[error("{kind} references missing {missing_kind} '{missing_id}'")]
    DanglingReference {
        kind: RecordKind,
        missing_kind: RecordKind,
        missing_id: RecordId,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RecordError {
    pub(crate) fn from_repository(kind: RecordKind, id: &RecordId, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound {
                kind,
                id: id.clone(),
            },
            RepositoryError::Conflict => Self::Duplicate {
                kind,
                key: id.to_string(),
            },
            RepositoryError::DuplicateKey(key) => Self::Duplicate { kind, key },
            other => Self::Repository(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RecordError::Validation(_) | RecordError::DanglingReference { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
            RecordError::Duplicate { .. } | RecordError::InUse { .. } => StatusCode::CONFLICT,
            RecordError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = self.status();
        let payload = match &self {
            RecordError::InUse { referenced_by, .. } => json!({
                "error": self.to_string(),
                "referencedBy": referenced_by,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}
