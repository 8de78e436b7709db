use serde::{Deserialize, Serialize};

/// Markers, delimiters and labels describing the ledger document format.
///
/// Every field has a default matching the monthly bill log layout, so a
/// config file only needs the settings it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Heading that opens the region holding daily entries.
    pub start_marker: String,
    /// Heading that closes the region; nothing after it is read.
    pub end_marker: String,
    /// Sub-heading prefix of a date section. The rest of the line is the label.
    pub date_prefix: String,
    /// Text found only in the table's column-header row.
    pub header_label: String,
    /// Text found only in the table's alignment row.
    pub separator_token: String,
    pub field_delimiter: char,
    pub tag_delimiter: char,
    pub expense_label: String,
    pub income_label: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            start_marker: "## 1. 日常收支".to_string(),
            end_marker: "## 2. 收支汇总".to_string(),
            date_prefix: "### ".to_string(),
            header_label: "分类 1".to_string(),
            separator_token: ":----:".to_string(),
            field_delimiter: '|',
            tag_delimiter: '、',
            expense_label: "支出".to_string(),
            income_label: "收入".to_string(),
        }
    }
}
