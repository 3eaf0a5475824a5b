//! Reference dataset behind the cost calculator: construction types, build packages,
//! investment levels, area coefficients, and the unit price matrix.

pub mod domain;
pub mod import;
pub mod router;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BuildPackage, Coefficient, CoefficientDraft, ConstructionType, InvestmentLevel, Named,
    NamedDraft, PriceKey, PriceMatrixRow, UnitPrice, UnitPriceDraft,
};
pub use import::{CatalogImporter, ImportError, PriceRow};
pub use router::catalog_router;
pub use seed::{CatalogSeed, SeedSummary};
pub use service::{CatalogRepositories, CatalogService};
