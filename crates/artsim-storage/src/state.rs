//! Backend-independent storage state and the operations on it.

use artsim_core::error::{ArtsimError, Result};
use artsim_core::types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    /// Last issued article id; 0 before the first allocation.
    pub article_counter: u64,
    /// Last issued group id; 0 before the first allocation.
    pub group_counter: u64,
    pub articles: BTreeMap<ArticleId, Article>,
    pub groups: Vec<DuplicateGroup>,
}

impl StoreState {
    pub fn next_article_id(&mut self) -> ArticleId {
        self.article_counter += 1;
        ArticleId(self.article_counter)
    }

    pub fn next_group_id(&mut self) -> DuplicateGroupId {
        self.group_counter += 1;
        DuplicateGroupId(self.group_counter)
    }

    pub fn insert_article(&mut self, article: &Article) -> Result<()> {
        if self.articles.contains_key(&article.id) {
            return Err(ArtsimError::storage(format!("article {} already exists", article.id)));
        }
        self.articles.insert(article.id, article.clone());
        Ok(())
    }

    pub fn set_duplicate_ids(&mut self, id: ArticleId, duplicate_ids: &[ArticleId]) -> Result<()> {
        let article = self.articles.get_mut(&id).ok_or(ArtsimError::NotFound { id })?;
        article.duplicate_ids = duplicate_ids.to_vec();
        Ok(())
    }

    pub fn article(&self, id: ArticleId) -> Result<Article> {
        self.articles.get(&id).cloned().ok_or(ArtsimError::NotFound { id })
    }

    /// Articles in id order, at most `limit`.
    pub fn articles(&self, limit: usize, unique_only: bool) -> Vec<Article> {
        self.articles
            .values()
            .filter(|a| !unique_only || a.is_unique)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn add_group_row(&mut self, group_id: DuplicateGroupId, article_id: ArticleId) {
        self.groups.push(DuplicateGroup { duplicate_group_id: group_id, article_id });
    }

    /// Membership rows in insertion order, at most `limit`.
    pub fn group_rows(&self, limit: usize) -> Vec<DuplicateGroup> {
        self.groups.iter().take(limit).copied().collect()
    }
}
