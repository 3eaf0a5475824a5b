use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{Record, RecordId, Timestamps};
use super::repository::{Repository, RepositoryError};
use super::store::RecordError;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Query string accepted by every list endpoint (`?page=2&pageSize=20&search=mái`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub search: Option<String>,
}

impl PageQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            search: None,
        }
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase)
    }
}

/// Paginated list response: `{ rows, total, page, pageSize, totalPages }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` according to `query`; out-of-range pages yield empty rows.
    pub fn from_items(items: Vec<T>, query: &PageQuery, default_page_size: usize) -> Self {
        let page_size = query
            .page_size
            .unwrap_or(default_page_size)
            .clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        let total = items.len();
        let total_pages = total.div_ceil(page_size);
        let rows = items
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Self {
            rows,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// One collection: a repository plus the id sequence and paging defaults for it.
pub struct Table<T: Record> {
    repository: Arc<dyn Repository<T>>,
    sequence: AtomicU64,
    default_page_size: usize,
}

impl<T: Record> Table<T> {
    pub fn new(repository: Arc<dyn Repository<T>>, default_page_size: usize) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
            default_page_size,
        }
    }

    fn repository_error(id: &RecordId, err: RepositoryError) -> RecordError {
        RecordError::from_repository(T::KIND, id, err)
    }

    fn next_id(&self) -> Result<RecordId, RecordError> {
        loop {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let id = RecordId(format!("{}-{seq:06}", T::KIND.id_prefix()));
            let taken = self
                .repository
                .fetch(&id)
                .map_err(|err| Self::repository_error(&id, err))?;
            if taken.is_none() {
                return Ok(id);
            }
        }
    }

    /// Validate a draft and turn it into a record with a fresh id, without storing it.
    pub fn prepare(&self, draft: T::Draft) -> Result<T, RecordError> {
        T::validate(&draft)?;
        let id = self.next_id()?;
        Ok(T::build(id, draft, Timestamps::new(Utc::now())))
    }

    /// Apply a draft onto the stored record, without storing the result.
    pub fn revise(&self, id: &RecordId, draft: T::Draft) -> Result<T, RecordError> {
        T::validate(&draft)?;
        let mut record = self.get(id)?;
        record.apply(draft);
        record.stamps_mut().touch(Utc::now());
        Ok(record)
    }

    pub fn insert(&self, record: T) -> Result<T, RecordError> {
        let id = record.id().clone();
        self.repository
            .insert(record)
            .map_err(|err| Self::repository_error(&id, err))
    }

    pub fn store(&self, record: T) -> Result<T, RecordError> {
        let id = record.id().clone();
        self.repository
            .update(record)
            .map_err(|err| Self::repository_error(&id, err))
    }

    pub fn remove(&self, id: &RecordId) -> Result<T, RecordError> {
        self.repository
            .remove(id)
            .map_err(|err| Self::repository_error(id, err))
    }

    pub fn fetch(&self, id: &RecordId) -> Result<Option<T>, RecordError> {
        self.repository
            .fetch(id)
            .map_err(|err| Self::repository_error(id, err))
    }

    pub fn get(&self, id: &RecordId) -> Result<T, RecordError> {
        self.fetch(id)?.ok_or_else(|| RecordError::NotFound {
            kind: T::KIND,
            id: id.clone(),
        })
    }

    pub fn all(&self) -> Result<Vec<T>, RecordError> {
        self.repository
            .list()
            .map_err(RecordError::Repository)
    }

    pub fn page(&self, query: &PageQuery) -> Result<Page<T>, RecordError> {
        self.page_filtered(query, |_| true)
    }

    /// Page over the records accepted by `keep`, after applying the search term.
    pub fn page_filtered<F>(&self, query: &PageQuery, keep: F) -> Result<Page<T>, RecordError>
    where
        F: Fn(&T) -> bool,
    {
        let needle = query.needle();
        let rows = self
            .all()?
            .into_iter()
            .filter(|record| keep(record))
            .filter(|record| needle.as_deref().map_or(true, |term| record.matches(term)))
            .collect();
        Ok(Page::from_items(rows, query, self.default_page_size))
    }
}
