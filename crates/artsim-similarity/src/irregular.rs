//! Irregular English verb table: maps simple past and past participle
//! forms back to the infinitive.

use artsim_core::error::{ArtsimError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const BUNDLED_TABLE: &str = include_str!("../data/irregular_verbs.csv");

/// Token → infinitive index built from a CSV verb table.
///
/// Rows are `infinitive,simple_past,past_participle`. A cell may list
/// alternatives separated by `/`. Lines starting with `#` are ignored.
///
/// A token that is itself an infinitive always maps to itself. Otherwise
/// the first row listing the token as an inflected form wins, so lookups
/// never depend on hash map iteration order.
#[derive(Debug, Clone, Default)]
pub struct IrregularVerbs {
    index: HashMap<String, String>,
    verbs: usize,
}

impl IrregularVerbs {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table compiled into the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_csv(BUNDLED_TABLE)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            ArtsimError::config(format!("failed to read verb table {}: {e}", path.display()))
        })?;
        let verbs = Self::from_csv(&data)?;
        debug!(path = %path.display(), verbs = verbs.len(), "loaded irregular verb table");
        Ok(verbs)
    }

    pub fn from_csv(data: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        let mut rows: Vec<(String, Vec<String>)> = Vec::new();
        for (n, record) in reader.records().enumerate() {
            let record = record
                .map_err(|e| ArtsimError::config(format!("malformed verb table: {e}")))?;
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            if record.len() < 3 || record.iter().take(3).any(|cell| cell.is_empty()) {
                let line = record.position().map(|p| p.line()).unwrap_or(n as u64 + 1);
                return Err(ArtsimError::config(format!(
                    "malformed verb table: line {line} needs infinitive, simple past and past participle"
                )));
            }
            let infinitive = record[0].to_lowercase();
            let forms = record
                .iter()
                .skip(1)
                .take(2)
                .flat_map(|cell| cell.split('/'))
                .map(|form| form.trim().to_lowercase())
                .filter(|form| !form.is_empty())
                .collect();
            rows.push((infinitive, forms));
        }

        let mut index = HashMap::new();
        for (infinitive, _) in &rows {
            index.insert(infinitive.clone(), infinitive.clone());
        }
        for (infinitive, forms) in &rows {
            for form in forms {
                index.entry(form.clone()).or_insert_with(|| infinitive.clone());
            }
        }

        Ok(Self { index, verbs: rows.len() })
    }

    /// Infinitive for `token`, or `None` if the token is not a known form.
    pub fn infinitive(&self, token: &str) -> Option<&str> {
        if let Some(inf) = self.index.get(token) {
            return Some(inf.as_str());
        }
        if token.bytes().any(|b| b.is_ascii_uppercase()) {
            return self.index.get(&token.to_ascii_lowercase()).map(String::as_str);
        }
        None
    }

    /// Infinitive for `token`, or the token unchanged.
    pub fn to_infinitive<'a>(&'a self, token: &'a str) -> &'a str {
        self.infinitive(token).unwrap_or(token)
    }

    /// Number of verbs (rows) in the table.
    pub fn len(&self) -> usize {
        self.verbs
    }

    pub fn is_empty(&self) -> bool {
        self.verbs == 0
    }
}
