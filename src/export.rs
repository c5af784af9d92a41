use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::models::Expense;

const HEADERS: [&str; 5] = ["Name", "Amount", "Category", "Date", "Recurring"];

/// Render expenses as CSV, one row per expense in the given order.
pub(crate) fn to_csv(expenses: &[Expense]) -> Result<String> {
    if expenses.is_empty() {
        anyhow::bail!("No data to export");
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADERS)?;
    for e in expenses {
        let amount = e.amount.to_string();
        let date = e.date.format("%Y-%m-%d").to_string();
        wtr.write_record([
            e.name.as_str(),
            amount.as_str(),
            e.category.as_str(),
            date.as_str(),
            if e.is_recurring { "true" } else { "false" },
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write the CSV to `path` and return the number of rows written.
pub(crate) fn export_to_file(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let content = to_csv(expenses)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(expenses.len())
}

pub(crate) fn default_file_name(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%Y-%m-%d"))
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
