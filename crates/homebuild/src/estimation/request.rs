use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::area::codes;
use super::factors::{AlleyClass, BasementDepth, FrontageCount};
use crate::catalog::PriceKey;
use crate::records::{RecordId, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoofKind {
    /// Mái tôn.
    Metal,
    /// Mái BTCT (reinforced concrete).
    Concrete,
    /// Mái ngói.
    Tile,
}

impl RoofKind {
    pub const fn coefficient_code(self) -> &'static str {
        match self {
            Self::Metal => codes::ROOF_METAL,
            Self::Concrete => codes::ROOF_CONCRETE,
            Self::Tile => codes::ROOF_TILE,
        }
    }
}

impl FromStr for RoofKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "metal" | "ton" => Ok(Self::Metal),
            "concrete" | "btct" => Ok(Self::Concrete),
            "tile" | "ngoi" => Ok(Self::Tile),
            other => Err(format!(
                "unknown roof kind '{other}' (expected metal, concrete or tile)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoundationKind {
    /// Móng đơn.
    Isolated,
    /// Móng băng.
    Strip,
    /// Móng cọc.
    Pile,
}

impl FoundationKind {
    pub const fn coefficient_code(self) -> &'static str {
        match self {
            Self::Isolated => codes::FOUNDATION_ISOLATED,
            Self::Strip => codes::FOUNDATION_STRIP,
            Self::Pile => codes::FOUNDATION_PILE,
        }
    }
}

impl FromStr for FoundationKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "isolated" | "don" => Ok(Self::Isolated),
            "strip" | "bang" => Ok(Self::Strip),
            "pile" | "coc" => Ok(Self::Pile),
            other => Err(format!(
                "unknown foundation kind '{other}' (expected isolated, strip or pile)"
            )),
        }
    }
}

/// Building description submitted to the cost calculator.
///
/// Dimensions are metres, areas square metres. Optional areas default to the footprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateRequest {
    pub width: f64,
    pub length: f64,
    pub floors: u8,
    pub loft_area: f64,
    pub roof: Option<RoofKind>,
    pub roof_area: Option<f64>,
    pub balcony_area: f64,
    pub terrace_area: f64,
    pub garden_area: f64,
    pub stair_roof_area: f64,
    pub basement: Option<BasementDepth>,
    pub basement_area: Option<f64>,
    pub foundation: Option<FoundationKind>,
    pub frontage: FrontageCount,
    pub alley: AlleyClass,
    pub construction_type_id: Option<RecordId>,
    pub build_package_id: Option<RecordId>,
    pub investment_level_id: Option<RecordId>,
}

impl EstimateRequest {
    /// Minimal request: a plain building on one frontage and a wide street.
    pub fn new(width: f64, length: f64, floors: u8) -> Self {
        Self {
            width,
            length,
            floors,
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, key: PriceKey) -> Self {
        self.construction_type_id = Some(key.construction_type_id);
        self.build_package_id = Some(key.build_package_id);
        self.investment_level_id = Some(key.investment_level_id);
        self
    }

    pub fn footprint(&self) -> f64 {
        self.width * self.length
    }

    /// Check dimensions and selections, returning the selected price triple.
    pub fn validate(&self) -> Result<PriceKey, ValidationError> {
        positive("width", self.width)?;
        positive("length", self.length)?;
        if !self.footprint().is_finite() {
            return Err(ValidationError::new(
                "length",
                "width × length is too large to price",
            ));
        }
        if self.floors == 0 {
            return Err(ValidationError::new("floors", "must be at least 1"));
        }

        non_negative("loftArea", self.loft_area)?;
        non_negative("balconyArea", self.balcony_area)?;
        non_negative("terraceArea", self.terrace_area)?;
        non_negative("gardenArea", self.garden_area)?;
        non_negative("stairRoofArea", self.stair_roof_area)?;
        if let Some(area) = self.roof_area {
            non_negative("roofArea", area)?;
        }
        if let Some(area) = self.basement_area {
            non_negative("basementArea", area)?;
        }

        Ok(PriceKey {
            construction_type_id: selected("constructionTypeId", &self.construction_type_id)?,
            build_package_id: selected("buildPackageId", &self.build_package_id)?,
            investment_level_id: selected("investmentLevelId", &self.investment_level_id)?,
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be a positive number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be a non-negative number"))
    }
}

fn selected(field: &'static str, value: &Option<RecordId>) -> Result<RecordId, ValidationError> {
    match value {
        Some(id) if !id.as_str().trim().is_empty() => Ok(id.clone()),
        _ => Err(ValidationError::new(field, "a selection is required")),
    }
}
