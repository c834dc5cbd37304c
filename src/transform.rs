use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::cities::CityTable;
use crate::error::{DataError, Result};
use crate::ids::IdSource;
use crate::league::League;
use crate::table::{Table, Value};

pub const GAME_ID: &str = "game_id";
pub const TOTAL_GOALS: &str = "TG";

/// First month (August) of a new season.
const SEASON_START_MONTH: u32 = 8;
/// Columns kept between `game_id` and `TG`.
const LEADING_COLUMNS: usize = 3;

/// Concatenates the fetched season tables and adds the derived columns
/// (`Div`, `Date`, `season`, `game_id`, `TG`, `city_name`, `lat`, `lon`).
pub fn merge_and_derive(
    league: League,
    seasons: Vec<Table>,
    cities: &CityTable,
    ids: &mut dyn IdSource,
) -> Result<Table> {
    if seasons.iter().all(Table::is_empty) {
        return Err(DataError::EmptyInput);
    }
    let mut table = Table::concat(seasons);
    let n = table.len();

    let dates = match table.column("Date") {
        Some(col) => col.map(|v| v.and_then(parse_match_date)).collect::<Vec<_>>(),
        None => vec![None; n],
    };
    let bad_dates = table
        .column("Date")
        .map(|col| {
            col.zip(&dates)
                .filter(|(raw, parsed)| raw.is_some() && parsed.is_none())
                .count()
        })
        .unwrap_or(0);
    if bad_dates > 0 {
        debug!(bad_dates, "rows with unparseable match dates");
    }

    let total_goals = match (table.column("FTHG"), table.column("FTAG")) {
        (Some(home), Some(away)) => home
            .zip(away)
            .map(|(h, a)| total_goals(h, a))
            .collect::<Vec<_>>(),
        _ => vec![None; n],
    };

    let homes = match table.column("HomeTeam") {
        Some(col) => col
            .map(|v| v.and_then(|team| cities.lookup(&team.to_string())))
            .collect::<Vec<_>>(),
        None => vec![None; n],
    };
    let city_names = homes
        .iter()
        .map(|c| c.map(|c| Value::Text(c.name.clone())))
        .collect::<Vec<_>>();
    let lats = homes
        .iter()
        .map(|c| c.map(|c| Value::Float(c.lat)))
        .collect::<Vec<_>>();
    let lons = homes
        .iter()
        .map(|c| c.map(|c| Value::Float(c.lon)))
        .collect::<Vec<_>>();

    table.set_column("Div", vec![Some(Value::from(league.id())); n]);
    table.set_column(
        "Date",
        dates.iter().map(|d| d.map(Value::Date)).collect(),
    );
    table.set_column(
        "season",
        dates
            .iter()
            .map(|d| d.map(|d| Value::Text(season_for_date(d))))
            .collect(),
    );
    table.set_column(GAME_ID, (0..n).map(|_| Some(Value::Text(ids.next_id()))).collect());
    table.set_column(TOTAL_GOALS, total_goals);
    table.set_column("city_name", city_names);
    table.set_column("lat", lats);
    table.set_column("lon", lons);

    let dropped = table.drop_empty_columns();
    if !dropped.is_empty() {
        debug!(?dropped, "dropped columns with no values");
    }

    let order = column_order(table.columns());
    Ok(table.select(&order))
}

/// `game_id`, then the first three other columns, then `TG`, then the rest.
pub fn column_order(columns: &[String]) -> Vec<String> {
    let others = columns
        .iter()
        .filter(|c| *c != GAME_ID && *c != TOTAL_GOALS)
        .cloned()
        .collect::<Vec<_>>();
    let split = others.len().min(LEADING_COLUMNS);

    let mut order = Vec::with_capacity(columns.len());
    if columns.iter().any(|c| c == GAME_ID) {
        order.push(GAME_ID.to_string());
    }
    order.extend_from_slice(&others[..split]);
    if columns.iter().any(|c| c == TOTAL_GOALS) {
        order.push(TOTAL_GOALS.to_string());
    }
    order.extend_from_slice(&others[split..]);
    order
}

/// Day-first match dates: `dd/mm/yy`, `dd/mm/yyyy`, or ISO `yyyy-mm-dd`.
pub fn parse_match_date(value: &Value) -> Option<NaiveDate> {
    if let Value::Date(d) = value {
        return Some(*d);
    }
    let raw = value.as_str()?.trim();
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }
    let year_part = raw.rsplit('/').next()?;
    let fmt = if year_part.len() == 2 {
        "%d/%m/%y"
    } else {
        "%d/%m/%Y"
    };
    NaiveDate::parse_from_str(raw, fmt).ok()
}

/// `"YYYY/YYYY+1"`; August onwards belongs to the season starting that year.
pub fn season_for_date(date: NaiveDate) -> String {
    let start = if date.month() >= SEASON_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}/{}", start, start + 1)
}

fn total_goals(home: Option<&Value>, away: Option<&Value>) -> Option<Value> {
    let (home, away) = (home?, away?);
    if let (Some(h), Some(a)) = (home.as_i64(), away.as_i64()) {
        return h.checked_add(a).map(Value::Int);
    }
    Some(Value::Float(home.as_f64()? + away.as_f64()?))
}
