use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{DateSections, LedgerConfig, LedgerError, parse_amount};

/// Expense and income totals, overall and per secondary category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_expense: Decimal,
    pub total_income: Decimal,
    pub expense_by_category: BTreeMap<String, Decimal>,
    pub income_by_category: BTreeMap<String, Decimal>,
}

impl Summary {
    /// Income minus expense, saturating at the `Decimal` bounds.
    ///
    /// Exact for any summary returned by [`aggregate`], which rejects
    /// ledgers whose net does not fit.
    pub fn net(&self) -> Decimal {
        self.total_income.saturating_sub(self.total_expense)
    }
}

/// Sum every record into the expense or income side.
///
/// Records whose primary category is neither label are still checked for a
/// valid amount but contribute nothing. The first bad amount or out-of-range
/// total aborts the whole run.
pub fn aggregate(config: &LedgerConfig, sections: &DateSections) -> Result<Summary, LedgerError> {
    let mut summary = Summary::default();

    for (date, records) in sections {
        for record in records {
            let amount = parse_amount(&record.amount).map_err(|_| LedgerError::InvalidAmount {
                date: date.clone(),
                amount: record.amount.trim().to_string(),
            })?;

            let primary = record.primary_category.trim();
            let secondary = record.secondary_category.trim();

            let side = if primary == config.expense_label {
                Some((&mut summary.total_expense, &mut summary.expense_by_category))
            } else if primary == config.income_label {
                Some((&mut summary.total_income, &mut summary.income_by_category))
            } else {
                None
            };

            let Some((total, buckets)) = side else {
                debug!(%date, category = primary, "entry is neither expense nor income");
                continue;
            };

            let overflow = || LedgerError::AmountOverflow {
                date: date.clone(),
                category: secondary.to_string(),
            };
            let bucket = buckets.entry(secondary.to_string()).or_insert(Decimal::ZERO);
            *bucket = bucket.checked_add(amount).ok_or_else(overflow)?;
            *total = total.checked_add(amount).ok_or_else(overflow)?;
        }
    }

    summary
        .total_income
        .checked_sub(summary.total_expense)
        .ok_or(LedgerError::NetOverflow)?;

    Ok(summary)
}
