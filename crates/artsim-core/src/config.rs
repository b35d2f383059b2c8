use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ArtsimError, Result};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.95;
pub const DEFAULT_SCAN_LIMIT: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtsimConfig {
    pub similarity: SimilarityConfig,
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Minimum score in [0, 1] at which two articles are duplicates.
    pub threshold: f64,
    /// CSV table of irregular verbs. Takes precedence over the bundled table.
    pub irregular_verbs_path: Option<PathBuf>,
    pub bundled_verbs: bool,
    pub stopwords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ArtsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            other => Err(ArtsimError::config(format!("unknown storage backend: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    /// Upper bound on every listing query. Articles past it are not
    /// considered during duplicate detection.
    pub scan_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            irregular_verbs_path: None,
            bundled_verbs: true,
            stopwords: vec!["a".into(), "an".into(), "the".into()],
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data"),
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ArtsimConfig {
    /// Defaults overlaid with `ARTSIM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ArtsimConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("ARTSIM_SIMILARITY_THRESHOLD") {
            config.similarity.threshold = parse_var("ARTSIM_SIMILARITY_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("ARTSIM_IRREGULAR_VERBS") {
            config.similarity.irregular_verbs_path = Some(PathBuf::from(v));
        }
        if lookup("ARTSIM_DISABLE_BUNDLED_VERBS").is_some() {
            config.similarity.bundled_verbs = false;
        }
        if let Some(v) = lookup("ARTSIM_STOPWORDS") {
            config.similarity.stopwords = v
                .split(',')
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
        }

        if let Some(v) = lookup("ARTSIM_STORAGE_BACKEND") {
            config.storage.backend = v.parse()?;
        }
        if let Some(v) = lookup("ARTSIM_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ARTSIM_SCAN_LIMIT") {
            config.storage.scan_limit = parse_var("ARTSIM_SCAN_LIMIT", &v)?;
        }

        if let Some(v) = lookup("ARTSIM_HOST") {
            config.server.host = v;
        }
        if let Some(v) = lookup("ARTSIM_PORT") {
            config.server.port = parse_var("ARTSIM_PORT", &v)?;
        }
        if let Some(v) = lookup("ARTSIM_REQUEST_TIMEOUT_MS") {
            config.server.request_timeout_ms = parse_var("ARTSIM_REQUEST_TIMEOUT_MS", &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.similarity.threshold)?;
        if self.storage.scan_limit == 0 {
            return Err(ArtsimError::config("scan_limit must be greater than zero"));
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ArtsimError::config("request_timeout_ms must be greater than zero"));
        }
        Ok(())
    }
}

/// Threshold must be a finite number within [0, 1].
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ArtsimError::config(format!(
            "similarity threshold must be within [0, 1], got {threshold}"
        )));
    }
    Ok(())
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ArtsimError::config(format!("invalid {key}={value:?}: {e}")))
}
