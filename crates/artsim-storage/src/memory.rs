use artsim_core::config::DEFAULT_SCAN_LIMIT;
use artsim_core::error::Result;
use artsim_core::types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::state::StoreState;
use crate::traits::Storage;

/// In-memory storage.
pub struct MemoryStorage {
    state: RwLock<StoreState>,
    scan_limit: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_scan_limit(DEFAULT_SCAN_LIMIT)
    }

    pub fn with_scan_limit(scan_limit: usize) -> Self {
        Self { state: RwLock::new(StoreState::default()), scan_limit }
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.read().clone()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn next_article_id(&self) -> Result<ArticleId> {
        let id = self.state.write().next_article_id();
        debug!(%id, "allocated article id");
        Ok(id)
    }

    async fn create_article(&self, article: &Article) -> Result<()> {
        self.state.write().insert_article(article)
    }

    async fn update_duplicate_ids(&self, id: ArticleId, duplicate_ids: &[ArticleId]) -> Result<()> {
        self.state.write().set_duplicate_ids(id, duplicate_ids)
    }

    async fn article_by_id(&self, id: ArticleId) -> Result<Article> {
        self.state.read().article(id)
    }

    async fn all_articles(&self) -> Result<Vec<Article>> {
        Ok(self.state.read().articles(self.scan_limit, false))
    }

    async fn unique_articles(&self) -> Result<Vec<Article>> {
        Ok(self.state.read().articles(self.scan_limit, true))
    }

    async fn next_duplicate_group_id(&self) -> Result<DuplicateGroupId> {
        let group_id = self.state.write().next_group_id();
        debug!(group = %group_id, "allocated duplicate group id");
        Ok(group_id)
    }

    async fn create_duplicate_group(&self, group_id: DuplicateGroupId, article_id: ArticleId) -> Result<()> {
        self.state.write().add_group_row(group_id, article_id);
        Ok(())
    }

    async fn all_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        Ok(self.state.read().group_rows(self.scan_limit))
    }
}
