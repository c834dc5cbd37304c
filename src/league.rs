use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

pub const DEFAULT_ARCHIVE_URL: &str = "https://www.football-data.co.uk";

/// Season start years accepted by the collector.
pub const MIN_SEASON_YEAR: i32 = 1900;
pub const MAX_SEASON_YEAR: i32 = 9998;

/// Competitions published by the football-data.co.uk archive that we support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum League {
    SerieA,
    Epl,
}

impl League {
    pub const ALL: [League; 2] = [League::SerieA, League::Epl];

    pub fn parse(raw: &str) -> Result<Self, DataError> {
        match raw.trim() {
            "serie_a" => Ok(League::SerieA),
            "epl" => Ok(League::Epl),
            other => Err(DataError::InvalidLeague(other.to_string())),
        }
    }

    /// Identifier used for the `Div` column and the export file name.
    pub fn id(self) -> &'static str {
        match self {
            League::SerieA => "serie_a",
            League::Epl => "epl",
        }
    }

    /// Division code used by the archive in its file names.
    pub fn archive_code(self) -> &'static str {
        match self {
            League::SerieA => "I1",
            League::Epl => "E0",
        }
    }

    pub fn season_url(self, base: &str, year: i32) -> String {
        season_url(base, self, year)
    }
}

impl FromStr for League {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        League::parse(s)
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// `{base}/mmz4281/{YY}{YY+1}/{CODE}.csv` for the season starting in `year`.
pub fn season_url(base: &str, league: League, year: i32) -> String {
    format!(
        "{}/mmz4281/{}{}/{}.csv",
        base.trim_end_matches('/'),
        two_digit_year(i64::from(year)),
        two_digit_year(i64::from(year) + 1),
        league.archive_code()
    )
}

pub fn season_label(year: i32) -> String {
    format!("{}/{}", year, i64::from(year) + 1)
}

/// Checks both ends of a season range. A reversed range is valid and empty.
pub fn check_year_range(start: i32, end: i32) -> Result<(), DataError> {
    let valid = MIN_SEASON_YEAR..=MAX_SEASON_YEAR;
    if valid.contains(&start) && valid.contains(&end) {
        return Ok(());
    }
    Err(DataError::InvalidYearRange {
        start,
        end,
        min: MIN_SEASON_YEAR,
        max: MAX_SEASON_YEAR,
    })
}

fn two_digit_year(year: i64) -> String {
    format!("{:02}", year.rem_euclid(100))
}
