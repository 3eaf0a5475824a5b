//! Storage-agnostic record layer shared by the catalog and content modules.
//!
//! Every admin-managed entity implements [`Record`]; a [`Table`] owns id generation,
//! validation, and pagination on top of a [`Repository`], and services expose CRUD through
//! [`RecordStore`] so one set of axum handlers can serve every collection.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod store;
pub mod table;


pub use domain::{Record, RecordId, RecordKind, Timestamps, ValidationError};
pub use memory::MemoryRepository;
pub use repository::{Repository, RepositoryError};
pub use router::admin_routes;
pub use store::{RecordError, RecordStore};
pub use table::{Page, PageQuery, Table, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
