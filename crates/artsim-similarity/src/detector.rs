//! Duplicate decision: normalize both articles, score them with the
//! word-level Levenshtein metric and compare against a fixed threshold.

use artsim_core::config::{validate_threshold, SimilarityConfig};
use artsim_core::error::Result;
use artsim_core::types::ArticleId;
use tracing::debug;

use crate::irregular::IrregularVerbs;
use crate::levenshtein::Levenshtein;
use crate::normalizer::Normalizer;

/// Pairwise similarity check between two articles.
///
/// Implementations must be pure: the answer depends only on the two
/// contents, never on the ids, which are for diagnostics.
pub trait Similarity: Send + Sync {
    fn score(&self, id_a: ArticleId, content_a: &str, id_b: ArticleId, content_b: &str) -> f64;

    fn threshold(&self) -> f64;

    fn is_similar(&self, id_a: ArticleId, content_a: &str, id_b: ArticleId, content_b: &str) -> bool {
        self.score(id_a, content_a, id_b, content_b) >= self.threshold()
    }
}

#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    threshold: f64,
    normalizer: Normalizer,
    metric: Levenshtein,
}

impl DuplicateDetector {
    pub fn new(threshold: f64, normalizer: Normalizer) -> Result<Self> {
        validate_threshold(threshold)?;
        Ok(Self { threshold, normalizer, metric: Levenshtein::default() })
    }

    /// Build from configuration, loading the verb table. Fails on an
    /// invalid threshold or an unreadable/malformed table.
    pub fn from_config(config: &SimilarityConfig) -> Result<Self> {
        let verbs = match &config.irregular_verbs_path {
            Some(path) => IrregularVerbs::load(path)?,
            None if config.bundled_verbs => IrregularVerbs::bundled()?,
            None => IrregularVerbs::empty(),
        };
        Self::new(config.threshold, Normalizer::new(&config.stopwords, verbs))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Similarity of two raw texts, without logging.
    pub fn compare(&self, content_a: &str, content_b: &str) -> f64 {
        let a = self.normalizer.normalize(content_a);
        let b = self.normalizer.normalize(content_b);
        self.metric.similarity_words(&a, &b)
    }
}

impl Similarity for DuplicateDetector {
    fn score(&self, id_a: ArticleId, content_a: &str, id_b: ArticleId, content_b: &str) -> f64 {
        let score = self.compare(content_a, content_b);
        debug!(%id_a, %id_b, threshold = self.threshold, score, "compared articles");
        score
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }
}
