use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{
    BuildPackage, CatalogRepositories, CatalogSeed, CatalogService, ConstructionType,
    InvestmentLevel, PriceKey, UnitPrice,
};
use crate::config::PagingConfig;
use crate::estimation::AdditionalFactors;
use crate::records::{
    MemoryRepository, Record, RecordId, RecordStore, Repository, RepositoryError,
};

pub(super) fn empty_service() -> CatalogService {
    CatalogService::new(
        CatalogRepositories::in_memory(),
        AdditionalFactors::standard(),
        PagingConfig::default(),
    )
}

pub(super) fn seeded_service() -> CatalogService {
    let service = empty_service();
    CatalogSeed::standard()
        .apply(&service)
        .expect("standard seed applies");
    service
}

pub(super) fn id_named<T>(service: &CatalogService, name: &str) -> RecordId
where
    T: Record + crate::catalog::Named,
    CatalogService: RecordStore<T>,
{
    RecordStore::<T>::all(service)
        .expect("list succeeds")
        .into_iter()
        .find(|record| record.has_name(name))
        .map(|record| record.id().clone())
        .unwrap_or_else(|| panic!("{name} seeded"))
}

pub(super) fn key(service: &CatalogService, kind: &str, package: &str, level: &str) -> PriceKey {
    PriceKey {
        construction_type_id: id_named::<ConstructionType>(service, kind),
        build_package_id: id_named::<BuildPackage>(service, package),
        investment_level_id: id_named::<InvestmentLevel>(service, level),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(
    method: &str,
    uri: &str,
    payload: &Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(payload).expect("payload serializes"),
        ))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

/// Repository whose backing store has gone away.
pub(super) struct OfflineRepository;

impl<T: Record> Repository<T> for OfflineRepository {
    fn insert(&self, _record: T) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: T) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &RecordId) -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RecordId) -> Result<Option<T>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<T>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn service_with_offline_prices() -> CatalogService {
    let repositories = CatalogRepositories {
        unit_prices: Arc::new(OfflineRepository) as Arc<dyn Repository<UnitPrice>>,
        ..CatalogRepositories::in_memory()
    };
    CatalogService::new(
        repositories,
        AdditionalFactors::standard(),
        PagingConfig::default(),
    )
}

pub(super) fn unit_price_repository() -> MemoryRepository<UnitPrice> {
    MemoryRepository::default()
}

/// Unit price storage that reports each insert and then stalls before writing it, so a
/// competing request can be started while the insert is in flight.
pub(super) struct StallingInserts {
    inner: MemoryRepository<UnitPrice>,
    entered: Mutex<Sender<()>>,
    stall: Duration,
}

impl StallingInserts {
    pub(super) fn new(stall: Duration) -> (Self, Receiver<()>) {
        let (sender, receiver) = mpsc::channel();
        let repository = Self {
            inner: MemoryRepository::default(),
            entered: Mutex::new(sender),
            stall,
        };
        (repository, receiver)
    }
}

impl Repository<UnitPrice> for StallingInserts {
    fn insert(&self, record: UnitPrice) -> Result<UnitPrice, RepositoryError> {
        self.entered
            .lock()
            .expect("sender mutex poisoned")
            .send(())
            .ok();
        std::thread::sleep(self.stall);
        self.inner.insert(record)
    }

    fn update(&self, record: UnitPrice) -> Result<UnitPrice, RepositoryError> {
        self.inner.update(record)
    }

    fn remove(&self, id: &RecordId) -> Result<UnitPrice, RepositoryError> {
        self.inner.remove(id)
    }

    fn fetch(&self, id: &RecordId) -> Result<Option<UnitPrice>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self) -> Result<Vec<UnitPrice>, RepositoryError> {
        self.inner.list()
    }
}
