use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ledger::LedgerError;

pub(crate) const CURRENCY_SYMBOL: &str = "₹";

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"₹1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{CURRENCY_SYMBOL}{with_commas}.{dec_part}")
    } else {
        format!("{CURRENCY_SYMBOL}{with_commas}.{dec_part}")
    }
}

/// Parse a user-typed amount. Currency symbols, thousands separators and
/// surrounding whitespace are ignored. Negative values are rejected.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal, LedgerError> {
    let cleaned = s
        .replace(['$', ',', '₹'], "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        return Err(LedgerError::missing("amount"));
    }
    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| LedgerError::invalid("amount", format!("'{}' is not a number", s.trim())))?;
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid("amount", "must not be negative"));
    }
    Ok(amount)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, LedgerError> {
    let trimmed = s.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| LedgerError::invalid("date", format!("expected YYYY-MM-DD, got '{trimmed}'")))
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
