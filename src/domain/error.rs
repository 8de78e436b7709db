use thiserror::Error;

/// Fatal problems found in the ledger content itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Malformed row at line {line} (date {date}): expected 5 fields in {row:?}")]
    MalformedRow {
        line: usize,
        date: String,
        row: String,
    },

    #[error("Invalid amount {amount:?} under date {date}")]
    InvalidAmount { date: String, amount: String },

    #[error("Running total for {category:?} out of range at date {date}")]
    AmountOverflow { date: String, category: String },

    #[error("Net balance out of range")]
    NetOverflow,
}
