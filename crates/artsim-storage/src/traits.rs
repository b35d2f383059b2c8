use artsim_core::error::Result;
use artsim_core::types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
use async_trait::async_trait;

/// Persistence for articles, membership rows and the two id counters.
///
/// Listing operations are bounded by the backend's scan limit; rows past
/// the limit are silently left out.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Atomically increment and read the article counter.
    async fn next_article_id(&self) -> Result<ArticleId>;
    async fn create_article(&self, article: &Article) -> Result<()>;
    /// Replace the duplicate list of an existing article.
    async fn update_duplicate_ids(&self, id: ArticleId, duplicate_ids: &[ArticleId]) -> Result<()>;
    /// Fails with `ArtsimError::NotFound` when no such article exists.
    async fn article_by_id(&self, id: ArticleId) -> Result<Article>;
    async fn all_articles(&self) -> Result<Vec<Article>>;
    /// Articles whose stored `is_unique` flag is set.
    async fn unique_articles(&self) -> Result<Vec<Article>>;
    /// Atomically increment and read the group counter.
    async fn next_duplicate_group_id(&self) -> Result<DuplicateGroupId>;
    async fn create_duplicate_group(&self, group_id: DuplicateGroupId, article_id: ArticleId) -> Result<()>;
    async fn all_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>>;
}
