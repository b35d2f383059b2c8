//! Text normalization: raw article text → canonical lowercase tokens.

use regex::Regex;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::irregular::IrregularVerbs;

static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]+").unwrap());

pub const DEFAULT_STOPWORDS: [&str; 3] = ["a", "an", "the"];

/// Deterministic text normalizer.
///
/// 1. drop every character that is not an ASCII letter, ASCII digit or whitespace
/// 2. lowercase
/// 3. split on whitespace runs
/// 4. drop stopwords
/// 5. map irregular verb forms to their infinitive
#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: HashSet<String>,
    verbs: Arc<IrregularVerbs>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_STOPWORDS, IrregularVerbs::empty())
    }
}

impl Normalizer {
    pub fn new<I, S>(stopwords: I, verbs: IrregularVerbs) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
            verbs: Arc::new(verbs),
        }
    }

    pub fn with_verbs(mut self, verbs: IrregularVerbs) -> Self {
        self.verbs = Arc::new(verbs);
        self
    }

    pub fn verbs(&self) -> &IrregularVerbs {
        &self.verbs
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Strip punctuation and lowercase, keeping whitespace intact.
    pub fn clean(text: &str) -> String {
        RE_NON_WORD.replace_all(text, "").to_ascii_lowercase()
    }

    pub fn normalize(&self, text: &str) -> Vec<String> {
        let cleaned = Self::clean(text);
        cleaned
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .map(|token| self.verbs.to_infinitive(token).to_string())
            .collect()
    }
}
