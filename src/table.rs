use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

/// A single typed cell. Missing cells are represented as `None` at the row level.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl Value {
    /// Types a raw CSV cell: blank is missing, then integer, float, text.
    pub fn infer(raw: &str) -> Option<Value> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(n) = trimmed.parse::<i64>() {
            return Some(Value::Int(n));
        }
        if trimmed.bytes().any(|b| b.is_ascii_digit())
            && let Ok(x) = trimmed.parse::<f64>()
            && x.is_finite()
        {
            return Some(Value::Float(x));
        }
        Some(Value::Text(trimmed.to_string()))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Float(x) if x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
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

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

pub type Row = Vec<Option<Value>>;

/// Column-name-keyed table whose cells may be missing. Every row holds
/// exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, padding short rows with missing cells and cutting long ones.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)?.as_ref()
    }

    pub fn column<'a>(
        &'a self,
        name: &str,
    ) -> Option<impl Iterator<Item = Option<&'a Value>> + use<'a>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_ref()))
    }

    /// Replaces the values of `name` in place, or appends it as the last column.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<Value>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                let mut values = values.into_iter();
                for row in &mut self.rows {
                    row.push(values.next().flatten());
                }
            }
        }
    }

    /// Stacks tables row-wise. The result's columns are the union of the inputs
    /// in first-seen order; cells from tables lacking a column are missing.
    pub fn concat(tables: impl IntoIterator<Item = Table>) -> Table {
        let tables = tables.into_iter().collect::<Vec<_>>();
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for table in &tables {
            for col in &table.columns {
                if !positions.contains_key(col) {
                    positions.insert(col.clone(), columns.len());
                    columns.push(col.clone());
                }
            }
        }

        let total = tables.iter().map(Table::len).sum();
        let mut out = Table {
            columns,
            rows: Vec::with_capacity(total),
        };
        for table in tables {
            let mapping = table
                .columns
                .iter()
                .map(|c| positions[c])
                .collect::<Vec<_>>();
            for row in table.rows {
                let mut merged = vec![None; out.columns.len()];
                for (src, value) in row.into_iter().enumerate() {
                    merged[mapping[src]] = value;
                }
                out.rows.push(merged);
            }
        }
        out
    }

    /// Removes every column with no present value. Returns the dropped names.
    pub fn drop_empty_columns(&mut self) -> Vec<String> {
        let keep = (0..self.columns.len())
            .map(|idx| self.rows.iter().any(|row| row[idx].is_some()))
            .collect::<Vec<_>>();
        if keep.iter().all(|k| *k) {
            return Vec::new();
        }

        let mut dropped = Vec::new();
        let mut columns = Vec::new();
        for (col, keep) in self.columns.drain(..).zip(&keep) {
            if *keep {
                columns.push(col);
            } else {
                dropped.push(col);
            }
        }
        self.columns = columns;
        for row in &mut self.rows {
            let mut idx = 0;
            row.retain(|_| {
                let k = keep[idx];
                idx += 1;
                k
            });
        }
        dropped
    }

    /// Returns a copy holding the named columns in the given order. Unknown
    /// names are ignored.
    pub fn select(&self, order: &[String]) -> Table {
        let picks = order
            .iter()
            .filter_map(|name| self.column_index(name).map(|idx| (name.clone(), idx)))
            .collect::<Vec<_>>();
        Table {
            columns: picks.iter().map(|(name, _)| name.clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picks.iter().map(|(_, idx)| row[*idx].clone()).collect())
                .collect(),
        }
    }
}
