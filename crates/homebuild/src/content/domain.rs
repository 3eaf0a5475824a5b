use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::records::domain::{contains_folded, require_text};
use crate::records::{Record, RecordId, RecordKind, Timestamps, ValidationError};

/// Blog article. The body is stored as opaque HTML from the admin editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: RecordId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: String,
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDraft {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

impl BlogPostDraft {
    pub fn new(title: &str, slug: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            summary: None,
            body: String::new(),
            thumbnail: None,
            tags: Vec::new(),
            published: false,
        }
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }
}

/// Trimmed, non-empty tags in first-seen order, each kept once.
fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}

impl Record for BlogPost {
    type Draft = BlogPostDraft;

    const KIND: RecordKind = RecordKind::BlogPost;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn stamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn validate(draft: &BlogPostDraft) -> Result<(), ValidationError> {
        require_text("title", &draft.title)?;
        let slug = draft.slug.trim();
        if slug.is_empty() {
            return Err(ValidationError::new("slug", "must not be empty"));
        }
        let well_formed = slug
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
            && !slug.starts_with('-')
            && !slug.ends_with('-');
        if !well_formed {
            return Err(ValidationError::new(
                "slug",
                format!("'{slug}' may only contain a-z, 0-9 and inner '-'"),
            ));
        }
        Ok(())
    }

    fn build(id: RecordId, draft: BlogPostDraft, stamps: Timestamps) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            slug: draft.slug.trim().to_string(),
            summary: draft.summary,
            body: draft.body,
            thumbnail: draft.thumbnail,
            tags: clean_tags(draft.tags),
            published: draft.published,
            stamps,
        }
    }

    fn apply(&mut self, draft: BlogPostDraft) {
        self.title = draft.title.trim().to_string();
        self.slug = draft.slug.trim().to_string();
        self.summary = draft.summary;
        self.body = draft.body;
        self.thumbnail = draft.thumbnail;
        self.tags = clean_tags(draft.tags);
        self.published = draft.published;
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.slug.clone())
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.slug, needle)
            || self.tags.iter().any(|tag| contains_folded(tag, needle))
    }
}

/// Home page banner slot; lower positions render first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: RecordId,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: u32,
    pub active: bool,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerDraft {
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: u32,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

fn active_by_default() -> bool {
    true
}

impl BannerDraft {
    pub fn new(title: &str, image_url: &str, position: u32) -> Self {
        Self {
            title: title.to_string(),
            image_url: image_url.to_string(),
            link_url: None,
            position,
            active: true,
        }
    }
}

impl Record for Banner {
    type Draft = BannerDraft;

    const KIND: RecordKind = RecordKind::Banner;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn stamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn validate(draft: &BannerDraft) -> Result<(), ValidationError> {
        require_text("title", &draft.title)?;
        require_text("imageUrl", &draft.image_url)
    }

    fn build(id: RecordId, draft: BannerDraft, stamps: Timestamps) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            image_url: draft.image_url.trim().to_string(),
            link_url: draft.link_url,
            position: draft.position,
            active: draft.active,
            stamps,
        }
    }

    fn apply(&mut self, draft: BannerDraft) {
        self.title = draft.title.trim().to_string();
        self.image_url = draft.image_url.trim().to_string();
        self.link_url = draft.link_url;
        self.position = draft.position;
        self.active = draft.active;
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
    }
}

/// Time-boxed discount campaign; both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: RecordId,
    pub title: String,
    pub description: Option<String>,
    pub discount_percent: u8,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub active: bool,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

impl Promotion {
    pub fn is_running(&self, on: NaiveDate) -> bool {
        self.active && self.starts_on <= on && on <= self.ends_on
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub discount_percent: u8,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default = "active_by_default")]
    pub active: bool,
}

impl PromotionDraft {
    pub fn new(title: &str, discount_percent: u8, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            discount_percent,
            starts_on,
            ends_on,
            active: true,
        }
    }
}

impl Record for Promotion {
    type Draft = PromotionDraft;

    const KIND: RecordKind = RecordKind::Promotion;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn stamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn validate(draft: &PromotionDraft) -> Result<(), ValidationError> {
        require_text("title", &draft.title)?;
        if draft.discount_percent > 100 {
            return Err(ValidationError::new(
                "discountPercent",
                "must be between 0 and 100",
            ));
        }
        if draft.starts_on > draft.ends_on {
            return Err(ValidationError::new(
                "endsOn",
                format!("must not be before startsOn ({})", draft.starts_on),
            ));
        }
        Ok(())
    }

    fn build(id: RecordId, draft: PromotionDraft, stamps: Timestamps) -> Self {
        Self {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description,
            discount_percent: draft.discount_percent,
            starts_on: draft.starts_on,
            ends_on: draft.ends_on,
            active: draft.active,
            stamps,
        }
    }

    fn apply(&mut self, draft: PromotionDraft) {
        self.title = draft.title.trim().to_string();
        self.description = draft.description;
        self.discount_percent = draft.discount_percent;
        self.starts_on = draft.starts_on;
        self.ends_on = draft.ends_on;
        self.active = draft.active;
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || self
                .description
                .as_deref()
                .is_some_and(|text| contains_folded(text, needle))
    }
}
