use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::area::codes;

/// Number of street-facing sides of the lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontageCount {
    #[default]
    One,
    Two,
    ThreeOrMore,
}

impl FrontageCount {
    pub const fn ordered() -> [Self; 3] {
        [Self::One, Self::Two, Self::ThreeOrMore]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::One => "1 mặt tiền",
            Self::Two => "2 mặt tiền",
            Self::ThreeOrMore => "3 mặt tiền trở lên",
        }
    }

    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::One),
            2 => Some(Self::Two),
            _ => Some(Self::ThreeOrMore),
        }
    }
}

impl FromStr for FrontageCount {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_count)
            .ok_or_else(|| format!("frontage count must be 1 or more, got '{raw}'"))
    }
}

/// Width class of the access road, which drives material handling cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlleyClass {
    /// Street front or alley at least 5 m wide.
    #[default]
    Wide,
    /// Alley 3 m to 5 m wide.
    Medium,
    /// Alley narrower than 3 m.
    Narrow,
}

impl AlleyClass {
    pub const fn ordered() -> [Self; 3] {
        [Self::Wide, Self::Medium, Self::Narrow]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Wide => "Mặt tiền / hẻm trên 5m",
            Self::Medium => "Hẻm 3m - 5m",
            Self::Narrow => "Hẻm dưới 3m",
        }
    }
}

impl FromStr for AlleyClass {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wide" => Ok(Self::Wide),
            "medium" => Ok(Self::Medium),
            "narrow" => Ok(Self::Narrow),
            other => Err(format!(
                "unknown alley class '{other}' (expected wide, medium or narrow)"
            )),
        }
    }
}

/// Excavation depth class of a basement, measured below the pavement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasementDepth {
    /// 1.0 m to 1.2 m.
    Shallow,
    /// 1.2 m to 1.7 m.
    Medium,
    /// 1.7 m to 2.0 m.
    Deep,
    /// Deeper than 2.0 m.
    VeryDeep,
}

impl BasementDepth {
    pub const fn ordered() -> [Self; 4] {
        [Self::Shallow, Self::Medium, Self::Deep, Self::VeryDeep]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Shallow => "Độ sâu 1.0 - 1.2",
            Self::Medium => "Độ sâu 1.2 - 1.7",
            Self::Deep => "Độ sâu 1.7 - 2.0",
            Self::VeryDeep => "Độ sâu trên 2.0",
        }
    }

    /// Catalog coefficient code weighting the basement's area.
    pub const fn coefficient_code(self) -> &'static str {
        match self {
            Self::Shallow => codes::BASEMENT_1_0_1_2,
            Self::Medium => codes::BASEMENT_1_2_1_7,
            Self::Deep => codes::BASEMENT_1_7_2_0,
            Self::VeryDeep => codes::BASEMENT_OVER_2_0,
        }
    }
}

impl FromStr for BasementDepth {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "shallow" => Ok(Self::Shallow),
            "medium" => Ok(Self::Medium),
            "deep" => Ok(Self::Deep),
            "very_deep" => Ok(Self::VeryDeep),
            other => Err(format!(
                "unknown basement depth '{other}' (expected shallow, medium, deep or very_deep)"
            )),
        }
    }
}

impl fmt::Display for BasementDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Site-condition multipliers applied on top of the unit price.
///
/// A class missing from a map prices at 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFactors {
    pub frontage: BTreeMap<FrontageCount, f64>,
    pub alley: BTreeMap<AlleyClass, f64>,
    pub basement_depth: BTreeMap<BasementDepth, f64>,
}

impl AdditionalFactors {
    pub fn standard() -> Self {
        Self {
            frontage: BTreeMap::from([
                (FrontageCount::One, 1.0),
                (FrontageCount::Two, 1.03),
                (FrontageCount::ThreeOrMore, 1.05),
            ]),
            alley: BTreeMap::from([
                (AlleyClass::Wide, 1.0),
                (AlleyClass::Medium, 1.03),
                (AlleyClass::Narrow, 1.06),
            ]),
            basement_depth: BTreeMap::from([
                (BasementDepth::Shallow, 1.5),
                (BasementDepth::Medium, 1.7),
                (BasementDepth::Deep, 2.0),
                (BasementDepth::VeryDeep, 2.5),
            ]),
        }
    }

    pub fn frontage_multiplier(&self, frontage: FrontageCount) -> f64 {
        self.frontage.get(&frontage).copied().unwrap_or(1.0)
    }

    pub fn alley_multiplier(&self, alley: AlleyClass) -> f64 {
        self.alley.get(&alley).copied().unwrap_or(1.0)
    }

    /// Price factor for a declared basement: `1 + (multiplier - 1)`, or 1.0 without one.
    pub fn basement_multiplier(&self, depth: Option<BasementDepth>) -> f64 {
        match depth {
            Some(depth) => {
                let multiplier = self.basement_depth.get(&depth).copied().unwrap_or(1.0);
                1.0 + (multiplier - 1.0)
            }
            None => 1.0,
        }
    }

    /// Labelled listing for the public calculator's drop-downs.
    pub fn view(&self) -> AdditionalFactorsView {
        AdditionalFactorsView {
            frontage: FrontageCount::ordered()
                .into_iter()
                .map(|class| FactorOption::new(class, class.label(), self.frontage_multiplier(class)))
                .collect(),
            alley: AlleyClass::ordered()
                .into_iter()
                .map(|class| FactorOption::new(class, class.label(), self.alley_multiplier(class)))
                .collect(),
            basement_depth: BasementDepth::ordered()
                .into_iter()
                .map(|class| {
                    FactorOption::new(class, class.label(), self.basement_multiplier(Some(class)))
                })
                .collect(),
        }
    }
}

impl Default for AdditionalFactors {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorOption<K> {
    pub key: K,
    pub label: &'static str,
    pub multiplier: f64,
}

impl<K> FactorOption<K> {
    fn new(key: K, label: &'static str, multiplier: f64) -> Self {
        Self {
            key,
            label,
            multiplier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFactorsView {
    pub frontage: Vec<FactorOption<FrontageCount>>,
    pub alley: Vec<FactorOption<AlleyClass>>,
    pub basement_depth: Vec<FactorOption<BasementDepth>>,
}
