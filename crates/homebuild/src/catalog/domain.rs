use serde::{Deserialize, Serialize};

use crate::records::domain::{contains_folded, require_text};
use crate::records::{Record, RecordId, RecordKind, Timestamps, ValidationError};

/// Reference entities selectable by name in the estimator and CSV imports.
pub trait Named {
    fn name(&self) -> &str;

    fn has_name(&self, name: &str) -> bool {
        self.name().trim().to_lowercase() == name.trim().to_lowercase()
    }
}

/// Payload for the name-only reference entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDraft {
    pub name: String,
}

impl NamedDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

macro_rules! named_record {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            pub id: RecordId,
            pub name: String,
            #[serde(flatten)]
            pub stamps: Timestamps,
        }

        impl Named for $name {
            fn name(&self) -> &str {
                &self.name
            }
        }

        impl Record for $name {
            type Draft = NamedDraft;

            const KIND: RecordKind = $kind;

            fn id(&self) -> &RecordId {
                &self.id
            }

            fn stamps_mut(&mut self) -> &mut Timestamps {
                &mut self.stamps
            }

            fn validate(draft: &NamedDraft) -> Result<(), ValidationError> {
                require_text("name", &draft.name)
            }

            fn build(id: RecordId, draft: NamedDraft, stamps: Timestamps) -> Self {
                Self {
                    id,
                    name: draft.name.trim().to_string(),
                    stamps,
                }
            }

            fn apply(&mut self, draft: NamedDraft) {
                self.name = draft.name.trim().to_string();
            }

            fn unique_key(&self) -> Option<String> {
                Some(self.name.to_lowercase())
            }

            fn matches(&self, needle: &str) -> bool {
                contains_folded(&self.name, needle)
            }
        }
    };
}

named_record!(
    /// Kind of building, e.g. "Nhà phố", "Biệt thự", "Nhà cấp 4".
    ConstructionType,
    RecordKind::ConstructionType
);

named_record!(
    /// Scope of the contract, e.g. "Phần thô" (structure only) or "Trọn gói" (turnkey).
    BuildPackage,
    RecordKind::BuildPackage
);

named_record!(
    /// Finish tier, e.g. "Trung bình", "Khá", "Cao cấp".
    InvestmentLevel,
    RecordKind::InvestmentLevel
);

/// Fraction of a standard floor's cost contributed by one structural component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficient {
    pub id: RecordId,
    pub code: String,
    pub name: String,
    pub coefficient: f64,
    pub notes: Option<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoefficientDraft {
    pub code: String,
    pub name: String,
    pub coefficient: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CoefficientDraft {
    pub fn new(code: &str, name: &str, coefficient: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            coefficient,
            notes: None,
        }
    }
}

impl Record for Coefficient {
    type Draft = CoefficientDraft;

    const KIND: RecordKind = RecordKind::Coefficient;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn stamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn validate(draft: &CoefficientDraft) -> Result<(), ValidationError> {
        let code = draft.code.trim();
        if code.is_empty() {
            return Err(ValidationError::new("code", "must not be empty"));
        }
        if !code
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_')
        {
            return Err(ValidationError::new(
                "code",
                format!("'{code}' may only contain a-z, 0-9 and '_'"),
            ));
        }
        require_text("name", &draft.name)?;
        if !draft.coefficient.is_finite() || draft.coefficient < 0.0 {
            return Err(ValidationError::new(
                "coefficient",
                "must be a finite, non-negative number",
            ));
        }
        Ok(())
    }

    fn build(id: RecordId, draft: CoefficientDraft, stamps: Timestamps) -> Self {
        Self {
            id,
            code: draft.code.trim().to_string(),
            name: draft.name.trim().to_string(),
            coefficient: draft.coefficient,
            notes: draft.notes,
            stamps,
        }
    }

    fn apply(&mut self, draft: CoefficientDraft) {
        self.code = draft.code.trim().to_string();
        self.name = draft.name.trim().to_string();
        self.coefficient = draft.coefficient;
        self.notes = draft.notes;
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.code, needle) || contains_folded(&self.name, needle)
    }
}

/// The (type, package, level) triple a unit price is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceKey {
    pub construction_type_id: RecordId,
    pub build_package_id: RecordId,
    pub investment_level_id: RecordId,
}

/// Price per m² in VND for one (type, package, level) combination.
///
/// References are always ids; resolved rows come from the price matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPrice {
    pub id: RecordId,
    pub construction_type_id: RecordId,
    pub build_package_id: RecordId,
    pub investment_level_id: RecordId,
    pub price_per_m2: u64,
    pub description: Option<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl UnitPrice {
    pub fn key(&self) -> PriceKey {
        PriceKey {
            construction_type_id: self.construction_type_id.clone(),
            build_package_id: self.build_package_id.clone(),
            investment_level_id: self.investment_level_id.clone(),
        }
    }

    pub fn references(&self, id: &RecordId) -> bool {
        &self.construction_type_id == id
            || &self.build_package_id == id
            || &self.investment_level_id == id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitPriceDraft {
    pub construction_type_id: RecordId,
    pub build_package_id: RecordId,
    pub investment_level_id: RecordId,
    pub price_per_m2: u64,
    #[serde(default)]
    pub description: Option<String>,
}

impl Record for UnitPrice {
    type Draft = UnitPriceDraft;

    const KIND: RecordKind = RecordKind::UnitPrice;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn stamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn validate(draft: &UnitPriceDraft) -> Result<(), ValidationError> {
        require_text("constructionTypeId", draft.construction_type_id.as_str())?;
        require_text("buildPackageId", draft.build_package_id.as_str())?;
        require_text("investmentLevelId", draft.investment_level_id.as_str())?;
        if draft.price_per_m2 == 0 {
            return Err(ValidationError::new("pricePerM2", "must be greater than zero"));
        }
        Ok(())
    }

    fn build(id: RecordId, draft: UnitPriceDraft, stamps: Timestamps) -> Self {
        Self {
            id,
            construction_type_id: draft.construction_type_id,
            build_package_id: draft.build_package_id,
            investment_level_id: draft.investment_level_id,
            price_per_m2: draft.price_per_m2,
            description: draft.description,
            stamps,
        }
    }

    fn apply(&mut self, draft: UnitPriceDraft) {
        self.construction_type_id = draft.construction_type_id;
        self.build_package_id = draft.build_package_id;
        self.investment_level_id = draft.investment_level_id;
        self.price_per_m2 = draft.price_per_m2;
        self.description = draft.description;
    }

    fn unique_key(&self) -> Option<String> {
        Some(format!(
            "{}|{}|{}",
            self.construction_type_id, self.build_package_id, self.investment_level_id
        ))
    }

    fn matches(&self, needle: &str) -> bool {
        self.description
            .as_deref()
            .is_some_and(|description| contains_folded(description, needle))
    }
}

/// A unit price with its references resolved, as shown in the public price table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceMatrixRow {
    pub unit_price_id: RecordId,
    pub construction_type: ConstructionType,
    pub build_package: BuildPackage,
    pub investment_level: InvestmentLevel,
    pub price_per_m2: u64,
    pub description: Option<String>,
}
