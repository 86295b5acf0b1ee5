use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// One record of the source dataset, keyed by column name in insertion order.
pub type Row = IndexMap<String, Value>;

/// A single cell. Serialized as a plain JSON scalar.
///
/// Reads never fail. Each accessor documents the value it substitutes when a
/// cell is absent or malformed, so dirty datasets stay renderable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

static MISSING: Value = Value::Null;

/// Look up a column, reading an absent key as `Value::Null`.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&MISSING)
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

impl Value {
    /// Numeric reading of the cell.
    ///
    /// Finite numbers pass through, booleans read as 1/0 and text is parsed
    /// after trimming. Null, non-numeric text and non-finite numbers are `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Numeric reading with `default` substituted when there is none.
    pub fn number_or(&self, default: f64) -> f64 {
        self.as_number().unwrap_or(default)
    }

    /// Categorical reading of the cell.
    ///
    /// Empty text, zero, `false`, null and non-finite numbers are all falsy
    /// and read as `fallback`.
    pub fn label_or(&self, fallback: &str) -> String {
        match self {
            Value::Text(s) if !s.is_empty() => s.clone(),
            Value::Number(n) if n.is_finite() && *n != 0.0 => n.to_string(),
            Value::Bool(true) => "true".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Interpret the cell as a point in time, in whole Unix seconds.
    ///
    /// Numbers are epoch milliseconds. Text is tried as RFC 3339, then as a
    /// zone-less date-time or bare date, both taken as UTC.
    pub fn unix_seconds(&self) -> Option<i64> {
        match self {
            Value::Number(ms) if ms.is_finite() => Some((ms / 1000.0).floor() as i64),
            Value::Text(s) => parse_timestamp(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Plain text form: null prints as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

fn parse_timestamp(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp());
        }
    }
    None
}

/// An ordered sequence of rows, with loaders for the formats the CLI accepts.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Create a Dataset from a JSON Array of Objects
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let mut rows = Vec::with_capacity(array.len());
        for (idx, item) in array.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Item {} in array must be an object", idx))?;

            let mut row = Row::with_capacity(obj.len());
            for (key, val) in obj {
                let cell = match val {
                    serde_json::Value::Null => Value::Null,
                    serde_json::Value::Bool(b) => Value::Bool(*b),
                    serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(0.0)),
                    serde_json::Value::String(s) => Value::Text(s.clone()),
                    _ => return Err(anyhow!("Unsupported value type for field '{}' in row {}", key, idx)),
                };
                row.insert(key.clone(), cell);
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Create a Dataset from CSV text with a header line.
    ///
    /// Cells that parse as numbers become `Value::Number`, empty cells become
    /// `Value::Null`, everything else stays text.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
            let row: Row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, raw)| (h.clone(), csv_cell(raw)))
                .collect();
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// Union of the column names across all rows, in first-appearance order.
    ///
    /// Logged by the CLI when `--data` replaces the rows.
    pub fn headers(&self) -> Vec<String> {
        column_union(&self.rows)
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

pub(crate) fn column_union(rows: &[Row]) -> Vec<String> {
    let mut seen: IndexSet<String> = IndexSet::new();
    for row in rows {
        for key in row.keys() {
            if !seen.contains(key) {
                seen.insert(key.clone());
            }
        }
    }
    seen.into_iter().collect()
}

fn csv_cell(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Value::Null
    } else if let Ok(n) = trimmed.parse::<f64>() {
        Value::Number(n)
    } else {
        Value::Text(raw.to_string())
    }
}
