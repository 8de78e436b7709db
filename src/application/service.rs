use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::domain::{
    DateSections, LedgerConfig, LedgerParser, ParseState, Summary, aggregate,
};

use super::{AppError, CategorySummary, IncomeExpenseReport};

/// Application service running the parse and aggregate pipeline over a ledger file.
/// This is the primary interface for any client (CLI, tests, etc.).
pub struct LedgerService {
    config: LedgerConfig,
}

impl LedgerService {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    /// Build a service from a JSON config file, or the default format when `None`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = config_path else {
            return Ok(Self::new(LedgerConfig::default()));
        };

        let text = fs::read_to_string(path).map_err(|source| AppError::ConfigUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| AppError::ConfigInvalid {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================
    // Parsing
    // ========================

    /// Parse the ledger at `path`.
    pub fn parse_file(&self, path: &Path) -> Result<DateSections, AppError> {
        let file = File::open(path).map_err(|source| AppError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_reader(BufReader::new(file), path)
    }

    /// Parse a ledger from any buffered reader. Reading stops at the end marker.
    /// `path` only labels read errors.
    pub fn parse_reader<R: BufRead>(
        &self,
        reader: R,
        path: impl Into<PathBuf>,
    ) -> Result<DateSections, AppError> {
        let mut parser = LedgerParser::new(&self.config);
        let path = path.into();

        for line in reader.lines() {
            let line = line.map_err(|source| AppError::SourceUnavailable {
                path: path.clone(),
                source,
            })?;
            if parser.feed(&line)? == ParseState::Done {
                break;
            }
        }

        Ok(parser.finish())
    }

    // ========================
    // Aggregation
    // ========================

    pub fn summarize(&self, sections: &DateSections) -> Result<Summary, AppError> {
        Ok(aggregate(&self.config, sections)?)
    }

    /// Parse, aggregate and report on the ledger at `path`.
    pub fn income_expense_report(&self, path: &Path) -> Result<IncomeExpenseReport, AppError> {
        let sections = self.parse_file(path)?;
        let summary = self.summarize(&sections)?;
        Ok(build_report(path.display().to_string(), &summary))
    }
}

/// Turn a [`Summary`] into a report with categories ordered by descending total.
pub fn build_report(source: String, summary: &Summary) -> IncomeExpenseReport {
    IncomeExpenseReport {
        source,
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        net: summary.net(),
        income_categories: category_summaries(&summary.income_by_category, summary.total_income),
        expense_categories: category_summaries(
            &summary.expense_by_category,
            summary.total_expense,
        ),
    }
}

fn category_summaries(
    buckets: &BTreeMap<String, Decimal>,
    total: Decimal,
) -> Vec<CategorySummary> {
    let mut categories: Vec<CategorySummary> = buckets
        .iter()
        .map(|(category, &amount)| CategorySummary {
            category: category.clone(),
            total: amount,
            percentage: share_percent(amount, total),
        })
        .collect();

    // BTreeMap order already sorts by name; the stable sort keeps it for ties
    categories.sort_by(|a, b| b.total.cmp(&a.total));
    categories
}

/// `amount` as a percentage of `total`; 0 when undefined or out of range.
fn share_percent(amount: Decimal, total: Decimal) -> f64 {
    amount
        .checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}
