use std::sync::Arc;

use chrono::NaiveDate;

use super::domain::{Banner, BlogPost, Promotion};
use crate::config::PagingConfig;
use crate::records::{
    MemoryRepository, Page, PageQuery, Record, RecordError, RecordId, RecordStore, Repository,
    Table,
};

pub struct ContentRepositories {
    pub posts: Arc<dyn Repository<BlogPost>>,
    pub banners: Arc<dyn Repository<Banner>>,
    pub promotions: Arc<dyn Repository<Promotion>>,
}

impl ContentRepositories {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(MemoryRepository::default()),
            banners: Arc::new(MemoryRepository::default()),
            promotions: Arc::new(MemoryRepository::default()),
        }
    }
}

/// Blog, banner and promotion collections with the filtered views the public site reads.
pub struct ContentService {
    posts: Table<BlogPost>,
    banners: Table<Banner>,
    promotions: Table<Promotion>,
}

impl ContentService {
    pub fn new(repositories: ContentRepositories, paging: PagingConfig) -> Self {
        let page_size = paging.default_page_size;
        Self {
            posts: Table::new(repositories.posts, page_size),
            banners: Table::new(repositories.banners, page_size),
            promotions: Table::new(repositories.promotions, page_size),
        }
    }

    pub fn published_posts(&self, query: &PageQuery) -> Result<Page<BlogPost>, RecordError> {
        self.posts.page_filtered(query, |post| post.published)
    }

    /// Drafts are reported as not found so unpublished slugs never leak.
    pub fn published_post(&self, slug: &str) -> Result<BlogPost, RecordError> {
        self.posts
            .all()?
            .into_iter()
            .find(|post| post.published && post.slug == slug)
            .ok_or_else(|| RecordError::NotFound {
                kind: BlogPost::KIND,
                id: RecordId::new(slug),
            })
    }

    pub fn active_banners(&self) -> Result<Vec<Banner>, RecordError> {
        let mut banners: Vec<Banner> = self
            .banners
            .all()?
            .into_iter()
            .filter(|banner| banner.active)
            .collect();
        banners.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(banners)
    }

    pub fn running_promotions(&self, on: NaiveDate) -> Result<Vec<Promotion>, RecordError> {
        Ok(self
            .promotions
            .all()?
            .into_iter()
            .filter(|promotion| promotion.is_running(on))
            .collect())
    }
}

impl RecordStore<BlogPost> for ContentService {
    fn table(&self) -> &Table<BlogPost> {
        &self.posts
    }
}

impl RecordStore<Banner> for ContentService {
    fn table(&self) -> &Table<Banner> {
        &self.banners
    }
}

impl RecordStore<Promotion> for ContentService {
    fn table(&self) -> &Table<Promotion> {
        &self.promotions
    }
}
