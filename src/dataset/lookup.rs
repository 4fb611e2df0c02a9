//! Record lookup by customer identifier
//!
//! Identifiers compare case-insensitively after trimming. The dataset keeps
//! an index from the normalized identifier to the position of the first
//! record carrying it, so lookups return the same record a front-to-back scan
//! would.

use super::{Dataset, Record};
use std::collections::HashMap;

/// Normalize an identifier for comparison
pub fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

pub(crate) fn build_index(records: &[Record]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        index.entry(normalize_id(record.id())).or_insert(position);
    }
    index
}

impl Dataset {
    /// Find the record for `id`
    ///
    /// Returns `None` when no record carries the identifier. Absence is an
    /// ordinary outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::dataset::parse_dataset;
    ///
    /// let dataset = parse_dataset("CUST_ID,INCOME\nC03PVPPHOY,100\n", "inline");
    /// assert!(dataset.find("  c03pvpphoy ").is_some());
    /// assert!(dataset.find("C000000000").is_none());
    /// ```
    pub fn find(&self, id: &str) -> Option<&Record> {
        let key = normalize_id(id);
        if key.is_empty() {
            return None;
        }
        self.index
            .get(&key)
            .and_then(|&position| self.records.get(position))
    }
}
