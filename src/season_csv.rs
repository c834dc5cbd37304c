use std::collections::HashMap;
use std::fmt;

use csv::ReaderBuilder;

use crate::table::{Row, Table, Value};

/// Why a data line was left out of its season table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooManyFields { expected: usize, found: usize },
    Empty,
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooManyFields { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            SkipReason::Empty => f.write_str("empty row"),
            SkipReason::Unreadable(err) => write!(f, "unreadable row: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Parsed,
    Skipped { line: u64, reason: SkipReason },
}

/// One season's rows plus the per-line parse outcomes.
#[derive(Debug, Clone, Default)]
pub struct ParsedSeason {
    pub table: Table,
    pub outcomes: Vec<RowOutcome>,
}

impl ParsedSeason {
    pub fn parsed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Parsed))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.parsed()
    }

    pub fn skips(&self) -> impl Iterator<Item = (u64, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match o {
            RowOutcome::Skipped { line, reason } => Some((*line, reason)),
            RowOutcome::Parsed => None,
        })
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses the raw CSV bytes of one season. Bad lines, including lines that
/// are not valid UTF-8, are skipped individually and reported in `outcomes`;
/// they never fail the season.
pub fn parse_season_csv(body: impl AsRef<[u8]>) -> ParsedSeason {
    let body = body.as_ref();
    let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let headers = match rdr.headers() {
        Ok(h) if !h.is_empty() => header_names(h.iter()),
        _ => return ParsedSeason::default(),
    };
    let width = headers.len();
    let mut table = Table::new(headers);
    let mut outcomes = Vec::new();

    for (idx, rec) in rdr.records().enumerate() {
        // Header is line 1.
        let fallback_line = idx as u64 + 2;
        let record = match rec {
            Ok(record) => record,
            Err(err) => {
                let line = err
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(fallback_line);
                outcomes.push(RowOutcome::Skipped {
                    line,
                    reason: SkipReason::Unreadable(err.to_string()),
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(fallback_line);

        if record.len() > width {
            outcomes.push(RowOutcome::Skipped {
                line,
                reason: SkipReason::TooManyFields {
                    expected: width,
                    found: record.len(),
                },
            });
            continue;
        }

        let row: Row = record.iter().map(Value::infer).collect();
        if row.iter().all(Option::is_none) {
            outcomes.push(RowOutcome::Skipped {
                line,
                reason: SkipReason::Empty,
            });
            continue;
        }
        table.push_row(row);
        outcomes.push(RowOutcome::Parsed);
    }

    ParsedSeason { table, outcomes }
}

// Blank headers become `Unnamed: N`; repeated names get a `.N` suffix so
// every column name stays unique.
fn header_names<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for (idx, name) in raw.enumerate() {
        let name = name.trim();
        let base = if name.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name.to_string()
        };
        let count = seen.entry(base.clone()).or_insert(0);
        let unique = if *count == 0 {
            base.clone()
        } else {
            format!("{base}.{count}")
        };
        *count += 1;
        out.push(unique);
    }
    out
}
