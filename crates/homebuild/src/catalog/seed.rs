use serde::Serialize;
use tracing::info;

use super::domain::{
    BuildPackage, Coefficient, CoefficientDraft, ConstructionType, InvestmentLevel, Named,
    NamedDraft, UnitPrice, UnitPriceDraft,
};
use super::import::{ImportError, PriceRow};
use super::service::CatalogService;
use crate::estimation::codes;
use crate::records::{Record, RecordId, RecordStore};

/// Reference data loaded into a fresh catalog at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSeed {
    pub construction_types: Vec<String>,
    pub build_packages: Vec<String>,
    pub investment_levels: Vec<String>,
    pub coefficients: Vec<CoefficientDraft>,
    pub unit_prices: Vec<PriceRow>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub construction_types: usize,
    pub build_packages: usize,
    pub investment_levels: usize,
    pub coefficients: usize,
    pub unit_prices: usize,
}

const NHA_PHO: &str = "Nhà phố";
const BIET_THU: &str = "Biệt thự";
const NHA_CAP_4: &str = "Nhà cấp 4";
const PHAN_THO: &str = "Phần thô";
const TRON_GOI: &str = "Trọn gói";
const TRUNG_BINH: &str = "Trung bình";
const KHA: &str = "Khá";
const CAO_CAP: &str = "Cao cấp";

impl CatalogSeed {
    /// The company's published sample price list.
    pub fn standard() -> Self {
        let coefficients = vec![
            CoefficientDraft::new(codes::GROUND_FLOOR, "Tầng trệt", 1.0),
            CoefficientDraft::new(codes::UPPER_FLOOR, "Tầng lầu", 1.0),
            CoefficientDraft::new(codes::LOFT, "Tầng lửng", 0.65),
            CoefficientDraft::new(codes::ROOF_METAL, "Mái tôn", 0.3),
            CoefficientDraft::new(codes::ROOF_CONCRETE, "Mái BTCT", 0.5),
            CoefficientDraft::new(codes::ROOF_TILE, "Mái ngói", 0.7),
            CoefficientDraft::new(codes::BALCONY, "Ban công", 0.5),
            CoefficientDraft::new(codes::TERRACE, "Sân thượng", 0.5),
            CoefficientDraft::new(codes::GARDEN, "Sân vườn", 0.3),
            CoefficientDraft::new(codes::STAIR_ROOF, "Tum thang", 1.0),
            CoefficientDraft::new(codes::BASEMENT_1_0_1_2, "Hầm độ sâu 1.0 - 1.2", 1.5),
            CoefficientDraft::new(codes::BASEMENT_1_2_1_7, "Hầm độ sâu 1.2 - 1.7", 1.7),
            CoefficientDraft::new(codes::BASEMENT_1_7_2_0, "Hầm độ sâu 1.7 - 2.0", 2.0),
            CoefficientDraft::new(codes::BASEMENT_OVER_2_0, "Hầm độ sâu trên 2.0", 2.5),
            CoefficientDraft::new(codes::FOUNDATION_ISOLATED, "Móng đơn", 0.2),
            CoefficientDraft::new(codes::FOUNDATION_STRIP, "Móng băng", 0.5),
            CoefficientDraft::new(codes::FOUNDATION_PILE, "Móng cọc", 0.3),
        ];

        let price_table: [(&str, &str, [u64; 3]); 6] = [
            (NHA_PHO, PHAN_THO, [5_500_000, 5_800_000, 6_200_000]),
            (NHA_PHO, TRON_GOI, [7_800_000, 8_600_000, 9_500_000]),
            (BIET_THU, PHAN_THO, [6_300_000, 6_700_000, 7_000_000]),
            (BIET_THU, TRON_GOI, [8_900_000, 9_900_000, 11_000_000]),
            (NHA_CAP_4, PHAN_THO, [4_200_000, 4_500_000, 4_800_000]),
            (NHA_CAP_4, TRON_GOI, [6_000_000, 6_600_000, 7_200_000]),
        ];
        let unit_prices = price_table
            .iter()
            .flat_map(|(kind, package, prices)| {
                [TRUNG_BINH, KHA, CAO_CAP]
                    .into_iter()
                    .zip(prices.iter())
                    .map(move |(level, price)| PriceRow::new(kind, package, level, *price))
            })
            .collect();

        Self {
            construction_types: vec![NHA_PHO.into(), BIET_THU.into(), NHA_CAP_4.into()],
            build_packages: vec![PHAN_THO.into(), TRON_GOI.into()],
            investment_levels: vec![TRUNG_BINH.into(), KHA.into(), CAO_CAP.into()],
            coefficients,
            unit_prices,
        }
    }

    pub fn with_coefficients(mut self, coefficients: Vec<CoefficientDraft>) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_unit_prices(mut self, unit_prices: Vec<PriceRow>) -> Self {
        self.unit_prices = unit_prices;
        self
    }

    /// Create every seeded record, resolving price rows by name.
    pub fn apply(&self, service: &CatalogService) -> Result<SeedSummary, ImportError> {
        for name in &self.construction_types {
            RecordStore::<ConstructionType>::create(service, NamedDraft::new(name.as_str()))?;
        }
        for name in &self.build_packages {
            RecordStore::<BuildPackage>::create(service, NamedDraft::new(name.as_str()))?;
        }
        for name in &self.investment_levels {
            RecordStore::<InvestmentLevel>::create(service, NamedDraft::new(name.as_str()))?;
        }
        for draft in &self.coefficients {
            RecordStore::<Coefficient>::create(service, draft.clone())?;
        }

        let types = RecordStore::<ConstructionType>::all(service)?;
        let packages = RecordStore::<BuildPackage>::all(service)?;
        let levels = RecordStore::<InvestmentLevel>::all(service)?;

        for (index, row) in self.unit_prices.iter().enumerate() {
            let line = index + 1;
            let draft = UnitPriceDraft {
                construction_type_id: resolve(&types, line, &row.construction_type)?,
                build_package_id: resolve(&packages, line, &row.build_package)?,
                investment_level_id: resolve(&levels, line, &row.investment_level)?,
                price_per_m2: row.price_per_m2,
                description: row.description.clone(),
            };
            RecordStore::<UnitPrice>::create(service, draft)?;
        }

        let summary = SeedSummary {
            construction_types: self.construction_types.len(),
            build_packages: self.build_packages.len(),
            investment_levels: self.investment_levels.len(),
            coefficients: self.coefficients.len(),
            unit_prices: self.unit_prices.len(),
        };
        info!(?summary, "catalog seeded");
        Ok(summary)
    }
}

fn resolve<T: Record + Named>(
    records: &[T],
    row: usize,
    name: &str,
) -> Result<RecordId, ImportError> {
    records
        .iter()
        .find(|record| record.has_name(name))
        .map(|record| record.id().clone())
        .ok_or_else(|| ImportError::UnknownReference {
            row,
            kind: T::KIND,
            name: name.to_string(),
        })
}
