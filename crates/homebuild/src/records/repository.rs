use super::domain::{Record, RecordId};

/// Storage abstraction so services can be exercised against any backend.
///
/// Implementations must reject an insert whose id already exists with
/// [`RepositoryError::Conflict`], and an insert or update whose [`Record::unique_key`]
/// collides with a different record with [`RepositoryError::DuplicateKey`]. `list`
/// returns records ordered by id.
pub trait Repository<T: Record>: Send + Sync {
    fn insert(&self, record: T) -> Result<T, RepositoryError>;
    fn update(&self, record: T) -> Result<T, RepositoryError>;
    fn remove(&self, id: &RecordId) -> Result<T, RepositoryError>;
    fn fetch(&self, id: &RecordId) -> Result<Option<T>, RepositoryError>;
    fn list(&self) -> Result<Vec<T>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("duplicate key '{0}'")]
    DuplicateKey(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
