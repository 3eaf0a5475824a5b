//! Marketing content managed from the back office: blog posts, banners, promotions.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Banner, BannerDraft, BlogPost, BlogPostDraft, Promotion, PromotionDraft};
pub use router::content_router;
pub use service::{ContentRepositories, ContentService};
