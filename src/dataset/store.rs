//! Lazily loaded, shared dataset store
//!
//! The store is constructed once and handed to whoever needs the dataset
//! (usually through an `Arc`). The first call to [`DatasetStore::load`]
//! reads and parses the source; every later call returns the same
//! `Arc<Dataset>`. Concurrent first callers wait on the same load.
//!
//! A source that cannot be read never surfaces as an error. The store logs
//! the failure and caches [`Dataset::fallback`] instead.

use super::{parse_dataset, Dataset};
use crate::config::DatasetConfig;
use crate::error::{Result, ScoremateError};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use url::Url;

/// Where the dataset text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A file on the local filesystem
    File(PathBuf),
    /// A file served over HTTP(S)
    Http(Url),
}

impl DatasetSource {
    /// Interpret a configured location
    ///
    /// Strings starting with `http://` or `https://` are URLs; anything else
    /// is a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error when the string looks like a URL but does not parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::dataset::DatasetSource;
    ///
    /// let file = DatasetSource::parse("data/credit_score.csv").unwrap();
    /// assert!(matches!(file, DatasetSource::File(_)));
    ///
    /// let http = DatasetSource::parse("https://example.com/credit_score.csv").unwrap();
    /// assert!(matches!(http, DatasetSource::Http(_)));
    /// ```
    pub fn parse(location: &str) -> Result<Self> {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|e| {
                ScoremateError::Config(format!("Invalid dataset URL '{}': {}", trimmed, e))
            })?;
            Ok(Self::Http(url))
        } else {
            Ok(Self::File(PathBuf::from(trimmed)))
        }
    }

    async fn fetch(&self, timeout: Duration) -> Result<String> {
        match self {
            Self::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            Self::Http(url) => {
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .user_agent(concat!("scoremate/", env!("CARGO_PKG_VERSION")))
                    .build()?;
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScoremateError::Provider(format!(
                        "dataset request returned {}",
                        status
                    ))
                    .into());
                }
                Ok(response.text().await?)
            }
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => write!(f, "{}", url),
        }
    }
}

/// Load-once holder for the customer dataset
#[derive(Debug)]
pub struct DatasetStore {
    source: DatasetSource,
    timeout: Duration,
    cell: OnceCell<Arc<Dataset>>,
}

impl DatasetStore {
    /// Create a store for `source`
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            timeout: Duration::from_secs(30),
            cell: OnceCell::new(),
        }
    }

    /// Create a store for the configured dataset location
    ///
    /// # Errors
    ///
    /// Returns an error when the location is a malformed URL.
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        let source = DatasetSource::parse(&config.source)?;
        Ok(Self::new(source).with_timeout(Duration::from_secs(config.timeout_seconds)))
    }

    /// Set the timeout used for HTTP sources
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create a store that is already loaded with `dataset`
    pub fn from_dataset(dataset: Dataset) -> Self {
        let source = DatasetSource::File(PathBuf::from(dataset.source()));
        Self {
            source,
            timeout: Duration::from_secs(30),
            cell: OnceCell::new_with(Some(Arc::new(dataset))),
        }
    }

    /// The configured source
    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Whether the dataset has been loaded already
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the dataset, loading it on first use
    ///
    /// Never fails: an unreadable source yields the fallback dataset, which
    /// is cached like a real one.
    pub async fn load(&self) -> Arc<Dataset> {
        self.cell
            .get_or_init(|| async {
                match self.source.fetch(self.timeout).await {
                    Ok(text) => {
                        let dataset = parse_dataset(&text, self.source.to_string());
                        tracing::info!(
                            source = %self.source,
                            records = dataset.len(),
                            "Loaded customer dataset"
                        );
                        metrics::increment_counter!("dataset_loads_total", "outcome" => "loaded");
                        Arc::new(dataset)
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = %self.source,
                            "Dataset unavailable, using fallback context: {}",
                            e
                        );
                        metrics::increment_counter!("dataset_loads_total", "outcome" => "fallback");
                        Arc::new(Dataset::fallback())
                    }
                }
            })
            .await
            .clone()
    }

    /// Start loading in the background
    ///
    /// Callers that need the dataset before the background load finishes
    /// simply wait for it inside [`load`](Self::load).
    pub fn preload(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.load().await;
        })
    }
}
