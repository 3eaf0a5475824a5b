use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use super::domain::{
    BuildPackage, Coefficient, ConstructionType, InvestmentLevel, Named, PriceKey,
    PriceMatrixRow, UnitPrice,
};
use crate::config::PagingConfig;
use crate::estimation::{
    AdditionalFactors, CoefficientTable, Estimate, EstimateRequest, EstimationEngine,
    EstimationError,
};
use crate::records::{
    MemoryRepository, Record, RecordError, RecordId, RecordStore, Repository, Table,
};

/// Storage backends for each reference collection.
pub struct CatalogRepositories {
    pub construction_types: Arc<dyn Repository<ConstructionType>>,
    pub build_packages: Arc<dyn Repository<BuildPackage>>,
    pub investment_levels: Arc<dyn Repository<InvestmentLevel>>,
    pub coefficients: Arc<dyn Repository<Coefficient>>,
    pub unit_prices: Arc<dyn Repository<UnitPrice>>,
}

impl CatalogRepositories {
    pub fn in_memory() -> Self {
        Self {
            construction_types: Arc::new(MemoryRepository::default()),
            build_packages: Arc::new(MemoryRepository::default()),
            investment_levels: Arc::new(MemoryRepository::default()),
            coefficients: Arc::new(MemoryRepository::default()),
            unit_prices: Arc::new(MemoryRepository::default()),
        }
    }
}

/// Service owning the reference collections and the estimator built on them.
///
/// Constructed once at startup and shared by `Arc`.
pub struct CatalogService {
    construction_types: Table<ConstructionType>,
    build_packages: Table<BuildPackage>,
    investment_levels: Table<InvestmentLevel>,
    coefficients: Table<Coefficient>,
    unit_prices: Table<UnitPrice>,
    engine: EstimationEngine,
    /// Serializes unit price writes against deletes of the records they reference.
    integrity: Mutex<()>,
}

impl CatalogService {
    pub fn new(
        repositories: CatalogRepositories,
        factors: AdditionalFactors,
        paging: PagingConfig,
    ) -> Self {
        let page_size = paging.default_page_size;
        Self {
            construction_types: Table::new(repositories.construction_types, page_size),
            build_packages: Table::new(repositories.build_packages, page_size),
            investment_levels: Table::new(repositories.investment_levels, page_size),
            coefficients: Table::new(repositories.coefficients, page_size),
            unit_prices: Table::new(repositories.unit_prices, page_size),
            engine: EstimationEngine::new(factors),
            integrity: Mutex::new(()),
        }
    }

    pub fn additional_factors(&self) -> &AdditionalFactors {
        self.engine.factors()
    }

    pub fn coefficient_table(&self) -> Result<CoefficientTable, RecordError> {
        Ok(CoefficientTable::from_records(&self.coefficients.all()?))
    }

    /// Every unit price with its references resolved; rows whose references were
    /// removed out-of-band are skipped.
    pub fn price_matrix(&self) -> Result<Vec<PriceMatrixRow>, RecordError> {
        let types = index_by_id(self.construction_types.all()?);
        let packages = index_by_id(self.build_packages.all()?);
        let levels = index_by_id(self.investment_levels.all()?);

        let rows = self
            .unit_prices
            .all()?
            .into_iter()
            .filter_map(|price| {
                Some(PriceMatrixRow {
                    construction_type: types.get(&price.construction_type_id)?.clone(),
                    build_package: packages.get(&price.build_package_id)?.clone(),
                    investment_level: levels.get(&price.investment_level_id)?.clone(),
                    unit_price_id: price.id,
                    price_per_m2: price.price_per_m2,
                    description: price.description,
                })
            })
            .collect();
        Ok(rows)
    }

    /// Resolve a (type, package, level) selection given by display names.
    pub fn select_by_names(
        &self,
        construction_type: &str,
        build_package: &str,
        investment_level: &str,
    ) -> Result<PriceKey, EstimationError> {
        Ok(PriceKey {
            construction_type_id: find_named(&self.construction_types, construction_type)?,
            build_package_id: find_named(&self.build_packages, build_package)?,
            investment_level_id: find_named(&self.investment_levels, investment_level)?,
        })
    }

    pub fn estimate(&self, request: &EstimateRequest) -> Result<Estimate, EstimationError> {
        let key = request.validate()?;
        require_reference(&self.construction_types, &key.construction_type_id)?;
        require_reference(&self.build_packages, &key.build_package_id)?;
        require_reference(&self.investment_levels, &key.investment_level_id)?;

        let coefficients = self.coefficient_table()?;
        let prices = self.unit_prices.all()?;
        let estimate = self.engine.estimate(request, &coefficients, &prices)?;

        info!(
            unit_price = %estimate.unit_price_id,
            weighted_area = estimate.weighted_area,
            estimated_cost = estimate.estimated_cost,
            "estimate computed"
        );
        Ok(estimate)
    }

    fn prices_referencing(&self, id: &RecordId) -> Result<Vec<RecordId>, RecordError> {
        Ok(self
            .unit_prices
            .all()?
            .into_iter()
            .filter(|price| price.references(id))
            .map(|price| price.id)
            .collect())
    }

    fn guard_unreferenced<T: Record>(&self, record: &T) -> Result<(), RecordError> {
        let referenced_by = self.prices_referencing(record.id())?;
        if referenced_by.is_empty() {
            Ok(())
        } else {
            Err(RecordError::InUse {
                kind: T::KIND,
                id: record.id().clone(),
                referenced_by,
            })
        }
    }
}

fn index_by_id<T: Record>(records: Vec<T>) -> HashMap<RecordId, T> {
    records
        .into_iter()
        .map(|record| (record.id().clone(), record))
        .collect()
}

fn find_named<T: Record + Named>(table: &Table<T>, name: &str) -> Result<RecordId, EstimationError> {
    table
        .all()?
        .into_iter()
        .find(|record| record.has_name(name))
        .map(|record| record.id().clone())
        .ok_or_else(|| EstimationError::UnknownName {
            kind: T::KIND,
            name: name.to_string(),
        })
}

fn require_reference<T: Record>(table: &Table<T>, id: &RecordId) -> Result<(), EstimationError> {
    match table.fetch(id)? {
        Some(_) => Ok(()),
        None => Err(EstimationError::ReferenceNotFound {
            kind: T::KIND,
            id: id.clone(),
        }),
    }
}

fn require_existing<T: Record>(table: &Table<T>, id: &RecordId) -> Result<(), RecordError> {
    match table.fetch(id)? {
        Some(_) => Ok(()),
        None => Err(RecordError::DanglingReference {
            kind: UnitPrice::KIND,
            missing_kind: T::KIND,
            missing_id: id.clone(),
        }),
    }
}

impl RecordStore<ConstructionType> for CatalogService {
    fn table(&self) -> &Table<ConstructionType> {
        &self.construction_types
    }

    fn integrity_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.integrity)
    }

    fn guard_delete(&self, record: &ConstructionType) -> Result<(), RecordError> {
        self.guard_unreferenced(record)
    }
}

impl RecordStore<BuildPackage> for CatalogService {
    fn table(&self) -> &Table<BuildPackage> {
        &self.build_packages
    }

    fn integrity_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.integrity)
    }

    fn guard_delete(&self, record: &BuildPackage) -> Result<(), RecordError> {
        self.guard_unreferenced(record)
    }
}

impl RecordStore<InvestmentLevel> for CatalogService {
    fn table(&self) -> &Table<InvestmentLevel> {
        &self.investment_levels
    }

    fn integrity_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.integrity)
    }

    fn guard_delete(&self, record: &InvestmentLevel) -> Result<(), RecordError> {
        self.guard_unreferenced(record)
    }
}

impl RecordStore<Coefficient> for CatalogService {
    fn table(&self) -> &Table<Coefficient> {
        &self.coefficients
    }
}

impl RecordStore<UnitPrice> for CatalogService {
    fn table(&self) -> &Table<UnitPrice> {
        &self.unit_prices
    }

    fn integrity_lock(&self) -> Option<&Mutex<()>> {
        Some(&self.integrity)
    }

    fn guard_write(&self, record: &UnitPrice) -> Result<(), RecordError> {
        require_existing(&self.construction_types, &record.construction_type_id)?;
        require_existing(&self.build_packages, &record.build_package_id)?;
        require_existing(&self.investment_levels, &record.investment_level_id)
    }
}
