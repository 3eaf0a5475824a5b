use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned by a [`super::Table`] when a record is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Every collection managed through the admin back-office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    ConstructionType,
    BuildPackage,
    InvestmentLevel,
    Coefficient,
    UnitPrice,
    BlogPost,
    Banner,
    Promotion,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConstructionType => "construction type",
            Self::BuildPackage => "build package",
            Self::InvestmentLevel => "investment level",
            Self::Coefficient => "coefficient",
            Self::UnitPrice => "unit price",
            Self::BlogPost => "blog post",
            Self::Banner => "banner",
            Self::Promotion => "promotion",
        }
    }

    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::ConstructionType => "ct",
            Self::BuildPackage => "pkg",
            Self::InvestmentLevel => "lvl",
            Self::Coefficient => "coef",
            Self::UnitPrice => "price",
            Self::BlogPost => "post",
            Self::Banner => "banner",
            Self::Promotion => "promo",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Audit timestamps carried by every stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Rejected input, reported back to the caller with the offending field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(())
}

pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// An admin-managed entity: how it is built from a draft, validated, and keyed.
pub trait Record: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Client-supplied payload for create and update requests.
    type Draft: DeserializeOwned + Clone + fmt::Debug + Send + 'static;

    const KIND: RecordKind;

    fn id(&self) -> &RecordId;

    fn stamps_mut(&mut self) -> &mut Timestamps;

    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    fn build(id: RecordId, draft: Self::Draft, stamps: Timestamps) -> Self;

    fn apply(&mut self, draft: Self::Draft);

    /// Natural key that must stay unique within the collection, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Case-insensitive search; `needle` is already lower-cased.
    fn matches(&self, needle: &str) -> bool;
}
