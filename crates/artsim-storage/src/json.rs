//! JSON snapshot storage.
//!
//! The whole [`StoreState`] is kept in memory and rewritten to
//! `<data_dir>/artsim.json` after every mutation. A mutation only becomes
//! visible once its snapshot is on disk, so a failed write leaves both the
//! file and the in-memory state unchanged.

use artsim_core::error::Result;
use artsim_core::types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::file_store::{read_optional, write_atomic};
use crate::state::StoreState;
use crate::traits::Storage;

pub const SNAPSHOT_FILE: &str = "artsim.json";

pub struct JsonFileStorage {
    path: PathBuf,
    state: Mutex<StoreState>,
    scan_limit: usize,
}

impl JsonFileStorage {
    /// Open (or create) the snapshot under `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>, scan_limit: usize) -> Result<Self> {
        let path = data_dir.as_ref().join(SNAPSHOT_FILE);
        let state = match read_optional(&path).await? {
            Some(bytes) => serde_json::from_slice::<StoreState>(&bytes)?,
            None => StoreState::default(),
        };
        info!(
            path = %path.display(),
            articles = state.articles.len(),
            groups = state.groups.len(),
            "opened json storage"
        );
        Ok(Self { path, state: Mutex::new(state), scan_limit })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn commit<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T> + Send,
        T: Send,
    {
        let mut state = self.state.lock().await;
        let mut next = state.clone();
        let out = f(&mut next)?;
        let bytes = serde_json::to_vec(&next)?;
        write_atomic(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "wrote snapshot");
        *state = next;
        Ok(out)
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn next_article_id(&self) -> Result<ArticleId> {
        let id = self.commit(|s| Ok(s.next_article_id())).await?;
        debug!(%id, "allocated article id");
        Ok(id)
    }

    async fn create_article(&self, article: &Article) -> Result<()> {
        self.commit(|s| s.insert_article(article)).await
    }

    async fn update_duplicate_ids(&self, id: ArticleId, duplicate_ids: &[ArticleId]) -> Result<()> {
        self.commit(|s| s.set_duplicate_ids(id, duplicate_ids)).await
    }

    async fn article_by_id(&self, id: ArticleId) -> Result<Article> {
        self.state.lock().await.article(id)
    }

    async fn all_articles(&self) -> Result<Vec<Article>> {
        Ok(self.state.lock().await.articles(self.scan_limit, false))
    }

    async fn unique_articles(&self) -> Result<Vec<Article>> {
        Ok(self.state.lock().await.articles(self.scan_limit, true))
    }

    async fn next_duplicate_group_id(&self) -> Result<DuplicateGroupId> {
        let group_id = self.commit(|s| Ok(s.next_group_id())).await?;
        debug!(group = %group_id, "allocated duplicate group id");
        Ok(group_id)
    }

    async fn create_duplicate_group(&self, group_id: DuplicateGroupId, article_id: ArticleId) -> Result<()> {
        self.commit(|s| {
            s.add_group_row(group_id, article_id);
            Ok(())
        })
        .await
    }

    async fn all_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        Ok(self.state.lock().await.group_rows(self.scan_limit))
    }
}
