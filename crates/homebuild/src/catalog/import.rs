use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::CoefficientDraft;
use crate::records::{RecordError, RecordKind};

/// Unit price row keyed by display names, as found in spreadsheets and seed data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceRow {
    pub construction_type: String,
    pub build_package: String,
    pub investment_level: String,
    pub price_per_m2: u64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
}

impl PriceRow {
    pub fn new(
        construction_type: &str,
        build_package: &str,
        investment_level: &str,
        price_per_m2: u64,
    ) -> Self {
        Self {
            construction_type: construction_type.to_string(),
            build_package: build_package.to_string(),
            investment_level: investment_level.to_string(),
            price_per_m2,
            description: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CoefficientRow {
    code: String,
    name: String,
    coefficient: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl From<CoefficientRow> for CoefficientDraft {
    fn from(row: CoefficientRow) -> Self {
        Self {
            code: row.code,
            name: row.name,
            coefficient: row.coefficient,
            notes: row.notes,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownReference {
        row: usize,
        kind: RecordKind,
        name: String,
    },
    Record(RecordError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            ImportError::UnknownReference { row, kind, name } => {
                write!(f, "price row {row} names unknown {kind} '{name}'")
            }
            ImportError::Record(err) => write!(f, "could not store catalog data: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::UnknownReference { .. } => None,
            ImportError::Record(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RecordError> for ImportError {
    fn from(err: RecordError) -> Self {
        Self::Record(err)
    }
}

/// Reads coefficient (`code,name,coefficient,notes`) and unit price
/// (`construction_type,build_package,investment_level,price_per_m2,description`) exports.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn coefficients_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<CoefficientDraft>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::coefficients_from_reader(file)
    }

    pub fn coefficients_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<CoefficientDraft>, ImportError> {
        let rows: Vec<CoefficientRow> = read_rows(reader)?;
        Ok(rows.into_iter().map(CoefficientDraft::from).collect())
    }

    pub fn prices_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRow>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::prices_from_reader(file)
    }

    pub fn prices_from_reader<R: Read>(reader: R) -> Result<Vec<PriceRow>, ImportError> {
        read_rows(reader)
    }
}

fn read_rows<R, T>(reader: R) -> Result<Vec<T>, ImportError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<T>() {
        rows.push(record?);
    }
    Ok(rows)
}
