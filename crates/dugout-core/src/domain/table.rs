//! Tabular payloads from the bulk pitch provider.

use std::collections::HashMap;

use dugout_warehouse::Value;

use crate::domain::record::{parse_float, parse_int, truncate_float};

/// Cell text treated as missing when loading a CSV export.
const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "NaN", "nan", "NULL", "null", "None", "none", "<NA>", "#N/A", "-nan",
];

/// Declared type of a destination column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    Float,
    Text,
}

impl ColumnKind {
    /// Convert an inferred cell to this column's type; failures become null.
    pub fn project(self, value: &Value) -> Value {
        match (self, value) {
            (_, Value::Null) => Value::Null,
            (Self::Int, Value::Int(v)) => Value::Int(*v),
            (Self::Int, Value::Float(v)) => truncate_float(*v).into(),
            (Self::Int, Value::Bool(v)) => Value::Int(i64::from(*v)),
            (Self::Int, Value::Text(v)) => parse_int(v).into(),
            (Self::Float, Value::Int(v)) => Value::Float(*v as f64),
            (Self::Float, Value::Float(v)) => Value::Float(*v),
            (Self::Float, Value::Text(v)) => parse_float(v).into(),
            (Self::Float, Value::Bool(_)) => Value::Null,
            (Self::Text, Value::Text(v)) => Value::Text(v.clone()),
            (Self::Text, other) => Value::Text(other.to_string()),
        }
    }
}

/// Infer a scalar from raw CSV text: NA markers, then integer, float, text.
pub fn infer_cell(text: &str) -> Value {
    let trimmed = text.trim();
    if NA_MARKERS.contains(&trimmed) {
        return Value::Null;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Value::Int(value);
    }
    if let Ok(value) = trimmed.parse::<f64>() {
        return if value.is_finite() {
            Value::Float(value)
        } else {
            Value::Null
        };
    }
    Value::Text(text.to_owned())
}

/// Column-named rows of inferred scalars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(position, name)| (name.clone(), position))
            .collect();
        Self {
            columns,
            index,
            rows: Vec::new(),
        }
    }

    /// Parse a headed CSV document. An empty body is an empty table.
    pub fn from_csv(body: &str) -> Result<Self, csv::Error> {
        let body = body.trim_start_matches('\u{feff}');
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());
        let columns = reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_owned())
            .collect::<Vec<_>>();

        let mut table = Self::new(columns);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(infer_cell).collect());
        }
        Ok(table)
    }

    /// Append a row; short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut cells: Vec<Value>) {
        cells.resize(self.columns.len(), Value::Null);
        self.rows.push(cells);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> + '_ {
        self.rows.iter().map(move |cells| TableRow { table: self, cells })
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    cells: &'a [Value],
}

impl TableRow<'_> {
    /// Cell under `column`; null when the column is absent.
    pub fn get(&self, column: &str) -> &Value {
        const NULL: &Value = &Value::Null;
        self.table
            .index
            .get(column)
            .and_then(|position| self.cells.get(*position))
            .unwrap_or(NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_cells_like_a_dataframe_loader() {
        assert_eq!(infer_cell(""), Value::Null);
        assert_eq!(infer_cell("NaN"), Value::Null);
        assert_eq!(infer_cell("12"), Value::Int(12));
        assert_eq!(infer_cell("95.4"), Value::Float(95.4));
        assert_eq!(infer_cell("FF"), Value::Text(String::from("FF")));
    }

    #[test]
    fn projects_values_through_declared_column_kinds() {
        assert_eq!(ColumnKind::Int.project(&Value::Float(5.0)), Value::Int(5));
        assert_eq!(ColumnKind::Int.project(&Value::Text(String::from("x"))), Value::Null);
        assert_eq!(ColumnKind::Float.project(&Value::Int(2)), Value::Float(2.0));
        assert_eq!(
            ColumnKind::Text.project(&Value::Int(2024)),
            Value::Text(String::from("2024"))
        );
    }

    #[test]
    fn parses_csv_with_bom_and_missing_cells() {
        let body = "\u{feff}pitch_type,release_speed,batter\nFF,95.1,660271\nSL,,592450\n";
        let table = Table::from_csv(body).expect("csv");

        assert_eq!(table.columns(), ["pitch_type", "release_speed", "batter"]);
        assert_eq!(table.len(), 2);
        let rows = table.rows().collect::<Vec<_>>();
        assert_eq!(rows[0].get("release_speed"), &Value::Float(95.1));
        assert_eq!(rows[1].get("release_speed"), &Value::Null);
        assert_eq!(rows[1].get("batter"), &Value::Int(592_450));
        assert_eq!(rows[1].get("not_there"), &Value::Null);
    }

    #[test]
    fn empty_body_is_an_empty_table() {
        let table = Table::from_csv("  \n").expect("csv");
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }
}
