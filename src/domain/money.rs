use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount with two fractional digits, rounding half away from zero.
/// Example: 7.998 -> "8.00", -2984.5 -> "-2984.50"
///
/// Totals keep full precision; rounding only happens here.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);
    rounded.to_string()
}

/// Parse the amount column of a ledger row.
///
/// Accepts an optional sign, an integer part and a fractional part; either
/// part may be empty but not both. Exponent notation is rejected.
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if units.is_empty() && fraction.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }
    if !is_digits(units) || !is_digits(fraction) {
        return Err(ParseAmountError::InvalidFormat);
    }

    let normalized = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if units.is_empty() { "0" } else { units },
        if fraction.is_empty() { "0" } else { fraction },
    );
    Decimal::from_str_exact(&normalized).map_err(|_| ParseAmountError::OutOfRange)
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    OutOfRange,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
            ParseAmountError::OutOfRange => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
