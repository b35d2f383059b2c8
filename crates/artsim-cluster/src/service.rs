use artsim_core::error::Result;
use artsim_core::types::{Article, ArticleId, DuplicateGroupId};
use artsim_similarity::Similarity;
use artsim_storage::Storage;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of scanning stored articles for duplicates of a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateMatch {
    /// Matching articles in scan order.
    pub duplicate_ids: Vec<ArticleId>,
    /// Group of the last match; `None` when nothing matched.
    pub group_id: Option<DuplicateGroupId>,
}

/// Compare `content` against every article in `existing`.
///
/// When matches span several groups the last one wins and the other groups
/// are left as they are; no merge happens.
pub fn scan_duplicates(
    similarity: &dyn Similarity,
    id: ArticleId,
    content: &str,
    existing: &[Article],
) -> DuplicateMatch {
    let mut found = DuplicateMatch::default();
    for article in existing {
        if similarity.is_similar(id, content, article.id, &article.content) {
            found.duplicate_ids.push(article.id);
            found.group_id = Some(article.duplicate_group_id);
        }
    }
    found
}

/// Creates articles, assigns duplicate groups and serves the read paths.
///
/// Creations are serialized by an internal lock held from id allocation
/// until propagation completes, so two similar articles created at the
/// same time always see each other. Reads take no lock.
pub struct ArticleService {
    storage: Arc<dyn Storage>,
    similarity: Arc<dyn Similarity>,
    write_lock: Mutex<()>,
}

impl ArticleService {
    pub fn new(storage: Arc<dyn Storage>, similarity: Arc<dyn Similarity>) -> Self {
        Self { storage, similarity, write_lock: Mutex::new(()) }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn similarity(&self) -> &Arc<dyn Similarity> {
        &self.similarity
    }

    /// Store a new article and link it to its duplicates.
    ///
    /// Only failing to allocate ids or to persist the article and its
    /// membership row is an error. A failed duplicate scan degrades to
    /// "unique"; failed peer updates are logged and skipped.
    pub async fn create_article(&self, content: &str) -> Result<Article> {
        let _guard = self.write_lock.lock().await;

        let id = self.storage.next_article_id().await?;

        let found = match self.find_duplicates(id, content).await {
            Ok(found) => found,
            Err(e) => {
                warn!(%id, error = %e, "duplicate detection failed, treating article as unique");
                DuplicateMatch::default()
            }
        };

        let group_id = match found.group_id {
            Some(group_id) => group_id,
            None => self.storage.next_duplicate_group_id().await?,
        };

        let article = Article::new(id, content, found.duplicate_ids, group_id);
        self.storage.create_article(&article).await?;
        self.storage.create_duplicate_group(group_id, id).await?;

        if !article.is_unique {
            self.link_to_peers(&article).await;
        }

        info!(
            %id,
            group = %group_id,
            unique = article.is_unique,
            duplicates = article.duplicate_ids.len(),
            "created article"
        );
        Ok(article)
    }

    async fn find_duplicates(&self, id: ArticleId, content: &str) -> Result<DuplicateMatch> {
        let existing = self.storage.all_articles().await?;
        let similarity = Arc::clone(&self.similarity);
        let content = content.to_owned();
        let found = tokio::task::spawn_blocking(move || {
            scan_duplicates(similarity.as_ref(), id, &content, &existing)
        })
        .await
        .map_err(anyhow::Error::from)?;
        Ok(found)
    }

    /// Append the new id to each matched peer, except peers whose stored
    /// `is_unique` flag is still set: those are left untouched.
    async fn link_to_peers(&self, article: &Article) {
        for &peer_id in &article.duplicate_ids {
            let peer = match self.storage.article_by_id(peer_id).await {
                Ok(peer) => peer,
                Err(e) => {
                    warn!(id = %article.id, peer = %peer_id, error = %e, "failed to load duplicate peer");
                    continue;
                }
            };

            if peer.is_unique {
                debug!(id = %article.id, peer = %peer_id, "peer stored as unique, not linking");
                continue;
            }

            let mut duplicate_ids = peer.duplicate_ids;
            duplicate_ids.push(article.id);
            if let Err(e) = self.storage.update_duplicate_ids(peer_id, &duplicate_ids).await {
                warn!(id = %article.id, peer = %peer_id, error = %e, "failed to link duplicate peer");
            }
        }
    }

    pub async fn article_by_id(&self, id: ArticleId) -> Result<Article> {
        self.storage.article_by_id(id).await
    }

    /// Articles whose stored `is_unique` flag is set.
    pub async fn unique_articles(&self) -> Result<Vec<Article>> {
        self.storage.unique_articles().await
    }

    pub async fn all_articles(&self) -> Result<Vec<Article>> {
        self.storage.all_articles().await
    }

    /// Group id → member article ids, in membership row order.
    pub async fn duplicate_groups(&self) -> Result<BTreeMap<DuplicateGroupId, Vec<ArticleId>>> {
        let rows = self.storage.all_duplicate_groups().await?;
        let mut groups: BTreeMap<DuplicateGroupId, Vec<ArticleId>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.duplicate_group_id).or_default().push(row.article_id);
        }
        Ok(groups)
    }
}
