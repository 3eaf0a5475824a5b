use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::domain::{BuildPackage, Coefficient, ConstructionType, InvestmentLevel, UnitPrice};
use super::service::CatalogService;
use crate::estimation::{EstimateRequest, EstimationError};
use crate::records::router::list_handler;
use crate::records::{admin_routes, RecordError};

/// Public calculator endpoints under `/v1/construction` and admin CRUD under
/// `/admin/construction`.
pub fn catalog_router(service: Arc<CatalogService>) -> Router {
    Router::new()
        .merge(admin_routes::<CatalogService, ConstructionType>(
            "/admin/construction/types",
        ))
        .merge(admin_routes::<CatalogService, BuildPackage>(
            "/admin/construction/packages",
        ))
        .merge(admin_routes::<CatalogService, InvestmentLevel>(
            "/admin/construction/levels",
        ))
        .merge(admin_routes::<CatalogService, Coefficient>(
            "/admin/construction/coefficients",
        ))
        .merge(admin_routes::<CatalogService, UnitPrice>(
            "/admin/construction/unit-prices",
        ))
        .route(
            "/v1/construction/types",
            get(list_handler::<CatalogService, ConstructionType>),
        )
        .route(
            "/v1/construction/packages",
            get(list_handler::<CatalogService, BuildPackage>),
        )
        .route(
            "/v1/construction/levels",
            get(list_handler::<CatalogService, InvestmentLevel>),
        )
        .route(
            "/v1/construction/coefficients",
            get(list_handler::<CatalogService, Coefficient>),
        )
        .route(
            "/v1/construction/unit-prices",
            get(list_handler::<CatalogService, UnitPrice>),
        )
        .route("/v1/construction/price-matrix", get(price_matrix_handler))
        .route(
            "/v1/construction/additional-factors",
            get(additional_factors_handler),
        )
        .route("/v1/construction/estimate", post(estimate_handler))
        .with_state(service)
}

pub(crate) async fn price_matrix_handler(
    State(service): State<Arc<CatalogService>>,
) -> Result<impl IntoResponse, RecordError> {
    let rows = service.price_matrix()?;
    Ok(Json(rows))
}

pub(crate) async fn additional_factors_handler(
    State(service): State<Arc<CatalogService>>,
) -> impl IntoResponse {
    Json(service.additional_factors().view())
}

pub(crate) async fn estimate_handler(
    State(service): State<Arc<CatalogService>>,
    Json(request): Json<EstimateRequest>,
) -> Result<impl IntoResponse, EstimationError> {
    let estimate = service.estimate(&request)?;
    Ok(Json(estimate))
}
