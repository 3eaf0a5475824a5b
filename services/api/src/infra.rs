use homebuild::catalog::{
    CatalogImporter, CatalogRepositories, CatalogSeed, CatalogService, SeedSummary,
};
use homebuild::config::{CatalogConfig, PagingConfig};
use homebuild::content::{ContentRepositories, ContentService};
use homebuild::error::AppError;
use homebuild::estimation::AdditionalFactors;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The bundled seed, with coefficient or price rows replaced by configured CSV exports.
pub(crate) fn catalog_seed(config: &CatalogConfig) -> Result<CatalogSeed, AppError> {
    let mut seed = CatalogSeed::standard();

    if let Some(path) = &config.coefficients_csv {
        let coefficients = CatalogImporter::coefficients_from_path(path)?;
        info!(path = %path.display(), rows = coefficients.len(), "coefficients imported");
        seed = seed.with_coefficients(coefficients);
    }
    if let Some(path) = &config.prices_csv {
        let prices = CatalogImporter::prices_from_path(path)?;
        info!(path = %path.display(), rows = prices.len(), "unit prices imported");
        seed = seed.with_unit_prices(prices);
    }

    Ok(seed)
}

/// In-memory catalog populated from [`catalog_seed`].
pub(crate) fn build_catalog(
    config: &CatalogConfig,
    paging: PagingConfig,
) -> Result<(CatalogService, SeedSummary), AppError> {
    let service = CatalogService::new(
        CatalogRepositories::in_memory(),
        AdditionalFactors::standard(),
        paging,
    );
    let summary = catalog_seed(config)?.apply(&service)?;
    Ok((service, summary))
}

pub(crate) fn build_content(paging: PagingConfig) -> ContentService {
    ContentService::new(ContentRepositories::in_memory(), paging)
}

/// Group thousands with dots, the way prices are quoted to customers.
pub(crate) fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push_str(" VND");
    grouped
}
