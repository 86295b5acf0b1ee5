use crate::data::{cell, Row, Value};
use tracing::trace;

/// Replace `column` with its period-over-period percentage change.
///
/// Row 0 becomes 0. Row i compares against the raw value of row i-1, never the
/// already transformed one. A zero previous value yields 0 rather than an
/// infinite change. Absent or non-numeric values read as 0.
pub fn percentage_change(rows: &[Row], column: &str) -> Vec<Row> {
    trace!(column, rows = rows.len(), "percentage change");

    let mut previous = 0.0;
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            let current = cell(row, column).number_or(0.0);
            let change = if idx == 0 || previous == 0.0 {
                0.0
            } else {
                (current - previous) / previous * 100.0
            };
            previous = current;

            let mut out = row.clone();
            out.insert(column.to_string(), Value::Number(change));
            out
        })
        .collect()
}

/// Name of the column `ratio` adds for `numerator`.
pub fn ratio_column(numerator: &str) -> String {
    format!("{}_ratio", numerator)
}

/// Add `{numerator}_ratio` = numerator / denominator to every row.
///
/// Original columns are kept. An absent numerator reads as 0, an absent
/// denominator as 1, and a zero denominator yields 0.
pub fn ratio(rows: &[Row], numerator: &str, denominator: &str) -> Vec<Row> {
    trace!(numerator, denominator, rows = rows.len(), "ratio");

    let target = ratio_column(numerator);
    rows.iter()
        .map(|row| {
            let num = cell(row, numerator).number_or(0.0);
            let den = cell(row, denominator).number_or(1.0);
            let value = if den == 0.0 { 0.0 } else { num / den };

            let mut out = row.clone();
            out.insert(target.clone(), Value::Number(value));
            out
        })
        .collect()
}
