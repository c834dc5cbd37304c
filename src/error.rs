use std::path::PathBuf;

/// Fatal failures surfaced by the collector and the transformer.
///
/// Per-season and per-row problems are not errors: they are recorded in
/// [`crate::collector::CollectReport`] and [`crate::season_csv::ParsedSeason`].
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("invalid league '{0}': must be 'serie_a' or 'epl'")]
    InvalidLeague(String),

    #[error("invalid year range {start}..={end}: years must lie within {min}..={max}")]
    InvalidYearRange {
        start: i32,
        end: i32,
        min: i32,
        max: i32,
    },

    #[error("no season tables to merge: no requested season produced any rows")]
    EmptyInput,

    #[error("required column '{0}' is missing from the table")]
    MissingColumn(String),

    #[error("failed to export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
