use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cities::CityTable;
use crate::config::CollectorConfig;
use crate::error::Result;
use crate::export::{export_path, write_table_csv};
use crate::http_client::{FetchOutcome, HttpSeasonSource, SeasonSource};
use crate::ids::{IdSource, RandomIds};
use crate::league::{League, check_year_range, season_label};
use crate::season_csv::parse_season_csv;
use crate::table::Table;
use crate::team_stats::{TeamStats, team_statistics};
use crate::transform::merge_and_derive;

pub struct FetchProgress {
    pub current: usize,
    pub total: usize,
    pub season: String,
}

/// A season that contributed no rows. Never fatal to a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonIssue {
    Unavailable { year: i32, status: u16 },
    FetchFailed { year: i32, cause: String },
}

impl SeasonIssue {
    pub fn year(&self) -> i32 {
        match self {
            SeasonIssue::Unavailable { year, .. } | SeasonIssue::FetchFailed { year, .. } => *year,
        }
    }
}

impl fmt::Display for SeasonIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonIssue::Unavailable { year, status } => write!(
                f,
                "data for season {} not found or could not be retrieved (http {status})",
                season_label(*year)
            ),
            SeasonIssue::FetchFailed { year, cause } => {
                write!(f, "request failed for season {}: {cause}", season_label(*year))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonSummary {
    pub year: i32,
    pub rows: usize,
    pub skipped_rows: usize,
}

/// Everything a single fetch pass produced: one table per season that
/// answered, plus what went wrong with the others. A season that answered
/// with no data rows keeps its (empty) table; merging only empty tables
/// fails with `EmptyInput`.
#[derive(Debug, Clone)]
pub struct CollectReport {
    pub league: League,
    pub seasons_total: usize,
    pub tables: Vec<Table>,
    pub seasons: Vec<SeasonSummary>,
    pub issues: Vec<SeasonIssue>,
}

impl CollectReport {
    pub fn seasons_succeeded(&self) -> usize {
        self.seasons.len()
    }

    pub fn rows(&self) -> usize {
        self.seasons.iter().map(|s| s.rows).sum()
    }

    pub fn skipped_rows(&self) -> usize {
        self.seasons.iter().map(|s| s.skipped_rows).sum()
    }
}

/// Fetches seasons of one league from the archive and turns them into a
/// single enriched match table.
pub struct DataCollector {
    league: League,
    config: CollectorConfig,
    source: Box<dyn SeasonSource>,
    cities: CityTable,
    ids: Box<dyn IdSource>,
}

impl DataCollector {
    pub fn new(league: &str) -> Result<Self> {
        Self::with_config(league, CollectorConfig::default())
    }

    pub fn with_config(league: &str, config: CollectorConfig) -> Result<Self> {
        let league = League::parse(league)?;
        let source = HttpSeasonSource::new(&config)?;
        Ok(Self {
            league,
            config,
            source: Box::new(source),
            cities: CityTable::builtin().clone(),
            ids: Box::new(RandomIds::new()),
        })
    }

    /// Builds a collector over any season source, e.g. an in-memory one in tests.
    pub fn with_source(
        league: &str,
        config: CollectorConfig,
        source: Box<dyn SeasonSource>,
        cities: CityTable,
    ) -> Result<Self> {
        Ok(Self {
            league: League::parse(league)?,
            config,
            source,
            cities,
            ids: Box::new(RandomIds::new()),
        })
    }

    pub fn with_ids(mut self, ids: Box<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn league(&self) -> League {
        self.league
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Fetch, merge and derive; optionally export to `<export_dir>/<league>.csv`.
    pub fn collect_data(&mut self, year_start: i32, year_end: i32, write_csv: bool) -> Result<Table> {
        let report = self.collect_seasons(year_start, year_end, |p| {
            info!("fetching season {} ({}/{})", p.season, p.current, p.total);
        })?;
        let table = self.merge(report.tables)?;
        if write_csv {
            self.export(&table)?;
        }
        Ok(table)
    }

    /// Requests every season in `[year_start, year_end]` in order. Failed
    /// seasons are logged and recorded, never retried. Years outside
    /// `MIN_SEASON_YEAR..=MAX_SEASON_YEAR` fail before any request.
    pub fn collect_seasons(
        &self,
        year_start: i32,
        year_end: i32,
        mut on_progress: impl FnMut(FetchProgress),
    ) -> Result<CollectReport> {
        check_year_range(year_start, year_end)?;
        let total = if year_end >= year_start {
            (year_end - year_start) as usize + 1
        } else {
            0
        };
        let mut report = CollectReport {
            league: self.league,
            seasons_total: total,
            tables: Vec::new(),
            seasons: Vec::new(),
            issues: Vec::new(),
        };

        for (idx, year) in (year_start..=year_end).enumerate() {
            on_progress(FetchProgress {
                current: idx + 1,
                total,
                season: season_label(year),
            });

            let url = self.league.season_url(&self.config.base_url, year);
            let issue = match self.source.fetch(&url) {
                FetchOutcome::Body(body) => {
                    let parsed = parse_season_csv(&body);
                    for (line, reason) in parsed.skips() {
                        debug!(season = %season_label(year), line, %reason, "skipped row");
                    }
                    let summary = SeasonSummary {
                        year,
                        rows: parsed.table.len(),
                        skipped_rows: parsed.skipped(),
                    };
                    info!(
                        league = %self.league,
                        season = %season_label(year),
                        rows = summary.rows,
                        skipped = summary.skipped_rows,
                        "season fetched"
                    );
                    report.seasons.push(summary);
                    report.tables.push(parsed.table);
                    continue;
                }
                FetchOutcome::Status(status) => SeasonIssue::Unavailable { year, status },
                FetchOutcome::Transport(cause) => SeasonIssue::FetchFailed { year, cause },
            };
            warn!(league = %self.league, url = %url, "{issue}");
            report.issues.push(issue);
        }

        Ok(report)
    }

    /// Merges fetched season tables; fails with `EmptyInput` when there are none.
    pub fn merge(&mut self, tables: Vec<Table>) -> Result<Table> {
        merge_and_derive(self.league, tables, &self.cities, self.ids.as_mut())
    }

    pub fn export(&self, table: &Table) -> Result<PathBuf> {
        let path = export_path(&self.config.export_dir, self.league);
        write_table_csv(&path, table)?;
        info!(path = %path.display(), rows = table.len(), "data written");
        Ok(path)
    }

    /// Per-team statistics. Independent of any collector state.
    pub fn compute_team_statistics(table: &Table) -> Result<Vec<TeamStats>> {
        team_statistics(table)
    }
}
