use std::collections::BTreeMap;

use serde::Serialize;

use super::request::EstimateRequest;
use super::EstimationError;
use crate::catalog::Coefficient;

/// Coefficient codes the calculator looks up in the catalog.
pub mod codes {
    pub const GROUND_FLOOR: &str = "tang_tret";
    pub const UPPER_FLOOR: &str = "tang_lau";
    pub const LOFT: &str = "tang_lung";
    pub const ROOF_METAL: &str = "mai_ton";
    pub const ROOF_CONCRETE: &str = "mai_btct";
    pub const ROOF_TILE: &str = "mai_ngoi";
    pub const BALCONY: &str = "ban_cong";
    pub const TERRACE: &str = "san_thuong";
    pub const GARDEN: &str = "san_vuon";
    pub const STAIR_ROOF: &str = "tum_thang";
    pub const BASEMENT_1_0_1_2: &str = "ham_1_0_1_2";
    pub const BASEMENT_1_2_1_7: &str = "ham_1_2_1_7";
    pub const BASEMENT_1_7_2_0: &str = "ham_1_7_2_0";
    pub const BASEMENT_OVER_2_0: &str = "ham_tren_2_0";
    pub const FOUNDATION_ISOLATED: &str = "mong_don";
    pub const FOUNDATION_STRIP: &str = "mong_bang";
    pub const FOUNDATION_PILE: &str = "mong_coc";
}

/// Coefficients keyed by code, snapshotted from the catalog for one estimate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoefficientTable {
    entries: BTreeMap<String, f64>,
}

impl CoefficientTable {
    pub fn from_records(records: &[Coefficient]) -> Self {
        records
            .iter()
            .map(|record| (record.code.clone(), record.coefficient))
            .collect()
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.entries.get(code).copied()
    }

    fn require(&self, code: &str) -> Result<f64, EstimationError> {
        self.get(code)
            .ok_or_else(|| EstimationError::MissingCoefficient(code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for CoefficientTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    GroundFloor,
    UpperFloors,
    Loft,
    Roof,
    Balcony,
    Terrace,
    Garden,
    StairRoof,
    Basement,
    Foundation,
}

impl ComponentKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GroundFloor => "Tầng trệt",
            Self::UpperFloors => "Tầng lầu",
            Self::Loft => "Tầng lửng",
            Self::Roof => "Mái",
            Self::Balcony => "Ban công",
            Self::Terrace => "Sân thượng",
            Self::Garden => "Sân vườn",
            Self::StairRoof => "Tum thang",
            Self::Basement => "Tầng hầm",
            Self::Foundation => "Móng",
        }
    }
}

/// One line of the weighted-area breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaComponent {
    pub kind: ComponentKind,
    pub label: &'static str,
    pub code: &'static str,
    pub area: f64,
    pub coefficient: f64,
    pub weighted_area: f64,
}

/// Declared areas paired with the coefficient code that weights them.
fn declared_areas(request: &EstimateRequest) -> Vec<(ComponentKind, &'static str, f64)> {
    let footprint = request.footprint();
    let upper_floors = f64::from(request.floors.saturating_sub(1));

    let mut parts = vec![
        (ComponentKind::GroundFloor, codes::GROUND_FLOOR, footprint),
        (
            ComponentKind::UpperFloors,
            codes::UPPER_FLOOR,
            footprint * upper_floors,
        ),
        (ComponentKind::Loft, codes::LOFT, request.loft_area),
    ];

    if let Some(roof) = request.roof {
        parts.push((
            ComponentKind::Roof,
            roof.coefficient_code(),
            request.roof_area.unwrap_or(footprint),
        ));
    }

    parts.extend([
        (ComponentKind::Balcony, codes::BALCONY, request.balcony_area),
        (ComponentKind::Terrace, codes::TERRACE, request.terrace_area),
        (ComponentKind::Garden, codes::GARDEN, request.garden_area),
        (ComponentKind::StairRoof, codes::STAIR_ROOF, request.stair_roof_area),
    ]);

    if let Some(depth) = request.basement {
        parts.push((
            ComponentKind::Basement,
            depth.coefficient_code(),
            request.basement_area.unwrap_or(footprint),
        ));
    }

    if let Some(foundation) = request.foundation {
        parts.push((
            ComponentKind::Foundation,
            foundation.coefficient_code(),
            footprint,
        ));
    }

    parts
}

/// Weight every declared component; components with no area are left out.
pub(crate) fn weigh_components(
    request: &EstimateRequest,
    table: &CoefficientTable,
) -> Result<Vec<AreaComponent>, EstimationError> {
    declared_areas(request)
        .into_iter()
        .filter(|(_, _, area)| *area > 0.0)
        .map(|(kind, code, area)| {
            let coefficient = table.require(code)?;
            Ok(AreaComponent {
                kind,
                label: kind.label(),
                code,
                area,
                coefficient,
                weighted_area: area * coefficient,
            })
        })
        .collect()
}
