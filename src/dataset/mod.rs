//! Customer dataset model and parser
//!
//! A dataset is a comma-separated text file whose first non-blank line is the
//! header. Every following non-blank line becomes one [`Record`]. Rows that do
//! not carry a `CUST_ID` value are dropped.
//!
//! Quoted fields are not supported: a comma inside a value splits it. The
//! source files this crate reads never quote, and the limitation is kept
//! rather than guessing at a dialect.
//!
//! Aggregate [`Statistics`] are computed once, when the dataset is parsed.

pub mod lookup;
pub mod store;

pub use store::{DatasetSource, DatasetStore};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

/// Name of the identifier column
pub const ID_COLUMN: &str = "CUST_ID";

/// Column holding the numeric credit score
pub const SCORE_COLUMN: &str = "CREDIT_SCORE";

/// Column flagging a defaulted customer
pub const DEFAULT_COLUMN: &str = "DEFAULT";

/// Value of [`DEFAULT_COLUMN`] that marks a default
pub const DEFAULT_MARKER: &str = "1";

/// One parsed row of the dataset
///
/// Values are trimmed. An empty value means the field is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: String,
    fields: HashMap<String, String>,
}

impl Record {
    /// Build a record from a header and a row of values
    ///
    /// Returns `None` when the row has no identifier value.
    fn from_row(header: &[String], values: &[&str]) -> Option<Self> {
        let fields: HashMap<String, String> = header
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let value = values.get(idx).map(|v| v.trim()).unwrap_or("");
                (column.clone(), value.to_string())
            })
            .collect();

        let id = fields.get(ID_COLUMN).filter(|v| !v.is_empty())?.clone();
        Some(Self { id, fields })
    }

    /// The customer identifier, as written in the file
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value of `column`, or `None` when the column is absent or empty
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::dataset::parse_dataset;
    ///
    /// let dataset = parse_dataset("CUST_ID,INCOME,DEBT\nC1,5000,\n", "inline");
    /// let record = dataset.find("c1").unwrap();
    /// assert_eq!(record.get("INCOME"), Some("5000"));
    /// assert_eq!(record.get("DEBT"), None);
    /// assert_eq!(record.get("SAVINGS"), None);
    /// ```
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Number of columns carried by the record (always the header width)
    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

/// Aggregate statistics over the whole dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Statistics {
    /// Number of records in the dataset
    pub total_records: usize,
    /// Number of records whose score parsed
    pub scored: usize,
    /// Average score, rounded to the nearest integer (0 when nothing parsed)
    pub average: i64,
    /// Lowest score (0 when nothing parsed)
    pub min: i64,
    /// Highest score (0 when nothing parsed)
    pub max: i64,
    /// Records flagged as defaulted
    pub defaulted: usize,
}

impl Statistics {
    /// Compute statistics for a set of records
    pub fn compute(records: &[Record]) -> Self {
        let scores: Vec<i64> = records
            .iter()
            .filter_map(|r| r.get(SCORE_COLUMN))
            .filter_map(parse_score)
            .collect();

        let (average, min, max) = if scores.is_empty() {
            (0, 0, 0)
        } else {
            let sum: i128 = scores.iter().map(|&s| i128::from(s)).sum();
            let average = (sum as f64 / scores.len() as f64).round() as i64;
            let min = scores.iter().copied().min().unwrap_or(0);
            let max = scores.iter().copied().max().unwrap_or(0);
            (average, min, max)
        };

        let defaulted = records
            .iter()
            .filter(|r| r.get(DEFAULT_COLUMN) == Some(DEFAULT_MARKER))
            .count();

        Self {
            total_records: records.len(),
            scored: scores.len(),
            average,
            min,
            max,
            defaulted,
        }
    }

    /// Fraction of records flagged as defaulted, 0.0 for an empty dataset
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::dataset::parse_dataset;
    ///
    /// let dataset = parse_dataset("CUST_ID,DEFAULT\nA,1\nB,0\nC,0\nD,0\n", "inline");
    /// let stats = dataset.statistics().unwrap();
    /// assert_eq!(stats.default_rate(), 0.25);
    /// ```
    pub fn default_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            self.defaulted as f64 / self.total_records as f64
        }
    }
}

/// Leading integer of a score value
static SCORE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("score prefix pattern is valid"));

/// Parse a score value
///
/// Only the leading integer counts: `612.9` reads as 612, `600pts` as 600 and
/// `1e3` as 1. Values without leading digits are ignored. Integers beyond the
/// `i64` range saturate.
fn parse_score(value: &str) -> Option<i64> {
    let digits = SCORE_PREFIX.captures(value)?.get(1)?.as_str();
    Some(digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// An in-memory customer dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    source: String,
    header: Vec<String>,
    records: Vec<Record>,
    index: HashMap<String, usize>,
    statistics: Option<Statistics>,
}

impl Dataset {
    /// The dataset used when the source cannot be loaded
    ///
    /// It has no records and no statistics; the context formatter renders a
    /// fixed narrative in their place.
    pub fn fallback() -> Self {
        Self {
            source: "fallback".to_string(),
            header: Vec::new(),
            records: Vec::new(),
            index: HashMap::new(),
            statistics: None,
        }
    }

    /// Where the dataset came from (path, URL, or `fallback`)
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column names in file order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Records in file order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Statistics computed at load time; `None` for the fallback dataset
    pub fn statistics(&self) -> Option<&Statistics> {
        self.statistics.as_ref()
    }

    /// Whether this is the fallback dataset
    pub fn is_fallback(&self) -> bool {
        self.statistics.is_none()
    }
}

/// Parse comma-separated text into a [`Dataset`]
///
/// # Arguments
///
/// * `text` - File contents
/// * `source` - Description of where the text came from, kept for logging
///
/// # Examples
///
/// ```
/// use scoremate::dataset::parse_dataset;
///
/// let csv = "CUST_ID,CREDIT_SCORE\nC01,600\n\n,650\nC02,800\n";
/// let dataset = parse_dataset(csv, "inline");
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.statistics().unwrap().average, 700);
/// ```
pub fn parse_dataset(text: &str, source: impl Into<String>) -> Dataset {
    let source = source.into();
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header: Vec<String> = match lines.next() {
        Some(line) => line.split(',').map(|h| h.trim().to_string()).collect(),
        None => Vec::new(),
    };

    if !header.is_empty() && !header.iter().any(|h| h == ID_COLUMN) {
        tracing::warn!(
            source = %source,
            "Dataset header has no {} column; no records will be loaded",
            ID_COLUMN
        );
    }

    let mut dropped = 0usize;
    let records: Vec<Record> = lines
        .filter_map(|line| {
            let values: Vec<&str> = line.split(',').collect();
            let record = Record::from_row(&header, &values);
            if record.is_none() {
                dropped += 1;
            }
            record
        })
        .collect();

    let index = lookup::build_index(&records);
    let statistics = Statistics::compute(&records);

    tracing::debug!(
        source = %source,
        records = records.len(),
        dropped,
        columns = header.len(),
        "Parsed dataset"
    );

    Dataset {
        source,
        header,
        records,
        index,
        statistics: Some(statistics),
    }
}
