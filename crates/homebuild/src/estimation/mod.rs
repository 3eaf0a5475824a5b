//! Construction cost estimation: weighted area × adjusted unit price.

mod area;
mod factors;
mod request;

#[cfg(test)]
mod tests;

pub use area::{codes, AreaComponent, CoefficientTable, ComponentKind};
pub use factors::{
    AdditionalFactors, AdditionalFactorsView, AlleyClass, BasementDepth, FactorOption,
    FrontageCount,
};
pub use request::{EstimateRequest, FoundationKind, RoofKind};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::catalog::{PriceKey, UnitPrice};
use crate::records::{RecordError, RecordId, RecordKind, ValidationError};

/// Stateless calculator holding the site-condition multipliers.
#[derive(Debug, Clone, Default)]
pub struct EstimationEngine {
    factors: AdditionalFactors,
}

impl EstimationEngine {
    pub fn new(factors: AdditionalFactors) -> Self {
        Self { factors }
    }

    pub fn factors(&self) -> &AdditionalFactors {
        &self.factors
    }

    /// Price a building against a coefficient snapshot and the unit price matrix.
    ///
    /// Fails with [`EstimationError::UnitPriceNotFound`] rather than falling back to
    /// another row when the selected triple has no price.
    pub fn estimate(
        &self,
        request: &EstimateRequest,
        coefficients: &CoefficientTable,
        prices: &[UnitPrice],
    ) -> Result<Estimate, EstimationError> {
        let key = request.validate()?;
        let unit_price = prices
            .iter()
            .find(|price| price.key() == key)
            .ok_or_else(|| EstimationError::UnitPriceNotFound(key.clone()))?;

        let components = area::weigh_components(request, coefficients)?;
        let weighted_area: f64 = components.iter().map(|line| line.weighted_area).sum();
        if !weighted_area.is_finite() {
            return Err(ValidationError::new(
                "weightedArea",
                "declared areas are too large to price",
            )
            .into());
        }

        let frontage_multiplier = self.factors.frontage_multiplier(request.frontage);
        let alley_multiplier = self.factors.alley_multiplier(request.alley);
        let basement_multiplier = self
            .factors
            .basement_multiplier(declared_basement(request, &components));
        let adjusted_price_per_m2 = unit_price.price_per_m2 as f64
            * frontage_multiplier
            * alley_multiplier
            * basement_multiplier;

        let cost = (weighted_area * adjusted_price_per_m2).round();
        if !cost.is_finite() || cost >= u64::MAX as f64 {
            return Err(ValidationError::new(
                "estimatedCost",
                "exceeds the largest quotable amount",
            )
            .into());
        }
        let estimated_cost = cost as u64;

        Ok(Estimate {
            components,
            footprint: request.footprint(),
            weighted_area,
            unit_price_id: unit_price.id.clone(),
            base_price_per_m2: unit_price.price_per_m2,
            frontage_multiplier,
            alley_multiplier,
            basement_multiplier,
            adjusted_price_per_m2,
            estimated_cost,
        })
    }
}

/// The basement class only counts when the breakdown actually carries a basement row.
fn declared_basement(
    request: &EstimateRequest,
    components: &[AreaComponent],
) -> Option<BasementDepth> {
    components
        .iter()
        .any(|line| line.kind == ComponentKind::Basement)
        .then_some(request.basement)
        .flatten()
}

/// Calculator output with the full breakdown so quotes can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub components: Vec<AreaComponent>,
    pub footprint: f64,
    pub weighted_area: f64,
    pub unit_price_id: RecordId,
    pub base_price_per_m2: u64,
    pub frontage_multiplier: f64,
    pub alley_multiplier: f64,
    pub basement_multiplier: f64,
    pub adjusted_price_per_m2: f64,
    /// Rounded to the nearest VND.
    pub estimated_cost: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum EstimationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} '{id}' not found")]
    ReferenceNotFound { kind: RecordKind, id: RecordId },
    #[error("no {kind} named '{name}'")]
    UnknownName { kind: RecordKind, name: String },
    #[error(
        "no unit price for construction type '{}', build package '{}', investment level '{}'",
        .0.construction_type_id,
        .0.build_package_id,
        .0.investment_level_id
    )]
    UnitPriceNotFound(PriceKey),
    #[error("coefficient '{0}' is not configured")]
    MissingCoefficient(String),
    #[error(transparent)]
    Catalog(#[from] RecordError),
}

impl EstimationError {
    pub fn status(&self) -> StatusCode {
        match self {
            EstimationError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EstimationError::ReferenceNotFound { .. }
            | EstimationError::UnknownName { .. }
            | EstimationError::UnitPriceNotFound(_)
            | EstimationError::MissingCoefficient(_) => StatusCode::NOT_FOUND,
            EstimationError::Catalog(err) => err.status(),
        }
    }
}

impl IntoResponse for EstimationError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
