use serde::{Deserialize, Serialize};
use std::fmt;

/// Article identifier issued by storage. Starts at 1 and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

/// Duplicate group identifier, allocated from a counter independent of [`ArticleId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DuplicateGroupId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DuplicateGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ArticleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

impl From<u64> for DuplicateGroupId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// A stored article.
///
/// `content`, `id` and `duplicate_group_id` never change after creation.
/// `duplicate_ids` may grow when later articles are linked back to this one.
/// `is_unique` reflects `duplicate_ids` at creation time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub content: String,
    #[serde(default)]
    pub duplicate_ids: Vec<ArticleId>,
    pub is_unique: bool,
    pub duplicate_group_id: DuplicateGroupId,
}

impl Article {
    pub fn new(
        id: ArticleId,
        content: impl Into<String>,
        duplicate_ids: Vec<ArticleId>,
        duplicate_group_id: DuplicateGroupId,
    ) -> Self {
        let is_unique = duplicate_ids.is_empty();
        Self {
            id,
            content: content.into(),
            duplicate_ids,
            is_unique,
            duplicate_group_id,
        }
    }
}

/// Membership row: one article belonging to one duplicate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub duplicate_group_id: DuplicateGroupId,
    pub article_id: ArticleId,
}
