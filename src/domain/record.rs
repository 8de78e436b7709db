use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of a daily bill table.
///
/// Text fields are kept exactly as they appear between the delimiters.
/// Trimming and amount parsing happen during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub primary_category: String,
    pub secondary_category: String,
    /// Unlike the other fields, each tag is trimmed and empty tags are dropped.
    pub tags: Vec<String>,
    pub amount: String,
    pub description: String,
}

/// Date label -> records under that heading, in ledger order.
pub type DateSections = BTreeMap<String, Vec<TransactionRecord>>;

/// Total number of records across all sections.
pub fn record_count(sections: &DateSections) -> usize {
    sections.values().map(Vec::len).sum()
}
