use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{DataError, Result};
use crate::table::{Table, Value};

const REQUIRED_COLUMNS: [&str; 5] = ["HomeTeam", "AwayTeam", "FTR", "FTHG", "FTAG"];

/// Home, away and combined record for one team across a merged table.
///
/// Ratios are `None` when their denominator is zero, e.g. `home_win_ratio`
/// for a team that only ever played away.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TeamStats {
    pub team: String,
    pub home_games: u32,
    pub home_wins: u32,
    pub home_draws: u32,
    pub home_goals: i64,
    pub away_games: u32,
    pub away_wins: u32,
    pub away_draws: u32,
    pub away_goals: i64,
    pub total_games: u32,
    pub total_wins: u32,
    pub total_draws: u32,
    pub total_goals: i64,
    pub win_ratio: Option<f64>,
    pub draw_ratio: Option<f64>,
    pub home_win_ratio: Option<f64>,
    pub away_win_ratio: Option<f64>,
    pub home_goal_ratio: Option<f64>,
    pub away_goal_ratio: Option<f64>,
    pub total_goal_ratio: Option<f64>,
}

impl TeamStats {
    fn new(team: String) -> Self {
        Self {
            team,
            ..Self::default()
        }
    }

    fn finish(&mut self) {
        self.total_games = self.home_games + self.away_games;
        self.total_wins = self.home_wins + self.away_wins;
        self.total_draws = self.home_draws + self.away_draws;
        self.total_goals = self.home_goals + self.away_goals;

        self.win_ratio = ratio(self.total_wins as f64, self.total_games);
        self.draw_ratio = ratio(self.total_draws as f64, self.total_games);
        self.home_win_ratio = ratio(self.home_wins as f64, self.home_games);
        self.away_win_ratio = ratio(self.away_wins as f64, self.away_games);
        self.home_goal_ratio = ratio(self.home_goals as f64, self.home_games);
        self.away_goal_ratio = ratio(self.away_goals as f64, self.away_games);
        self.total_goal_ratio = ratio(self.total_goals as f64, self.total_games);
    }
}

fn ratio(num: f64, games: u32) -> Option<f64> {
    (games > 0).then(|| num / games as f64)
}

/// Rolls a merged match table up into one row per team, sorted by name.
///
/// A team seen only at home (or only away) still gets a row with zero
/// counts on the other side.
pub fn team_statistics(table: &Table) -> Result<Vec<TeamStats>> {
    let [home_idx, away_idx, ftr_idx, fthg_idx, ftag_idx] = REQUIRED_COLUMNS.map(|name| {
        table
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))
    });
    let (home_idx, away_idx, ftr_idx, fthg_idx, ftag_idx) =
        (home_idx?, away_idx?, ftr_idx?, fthg_idx?, ftag_idx?);

    let mut teams: BTreeMap<String, TeamStats> = BTreeMap::new();
    for row in table.rows() {
        let result = row[ftr_idx].as_ref().and_then(Value::as_str);

        if let Some(home) = row[home_idx].as_ref() {
            let name = home.to_string();
            let entry = teams
                .entry(name.clone())
                .or_insert_with(|| TeamStats::new(name));
            entry.home_games += 1;
            match result {
                Some("H") => entry.home_wins += 1,
                Some("D") => entry.home_draws += 1,
                _ => {}
            }
            entry.home_goals += goals(row[fthg_idx].as_ref());
        }

        if let Some(away) = row[away_idx].as_ref() {
            let name = away.to_string();
            let entry = teams
                .entry(name.clone())
                .or_insert_with(|| TeamStats::new(name));
            entry.away_games += 1;
            match result {
                Some("A") => entry.away_wins += 1,
                Some("D") => entry.away_draws += 1,
                _ => {}
            }
            entry.away_goals += goals(row[ftag_idx].as_ref());
        }
    }

    Ok(teams
        .into_values()
        .map(|mut stats| {
            stats.finish();
            stats
        })
        .collect())
}

fn goals(value: Option<&Value>) -> i64 {
    value
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|x| x as i64)))
        .unwrap_or(0)
}

pub const STATS_COLUMNS: [&str; 20] = [
    "Team",
    "HomeGames",
    "HomeWins",
    "HomeDraws",
    "HomeGoals",
    "AwayGames",
    "AwayWins",
    "AwayDraws",
    "AwayGoals",
    "TotalGames",
    "TotalWins",
    "TotalDraws",
    "TotalGoals",
    "WinRatio",
    "DrawRatio",
    "HomeWinRatio",
    "AwayWinRatio",
    "HomeGoalRatio",
    "AwayGoalRatio",
    "TotalGoalRatio",
];

/// Renders the statistics as a table with an explicit `Team` column.
pub fn team_stats_table(stats: &[TeamStats]) -> Table {
    let columns = STATS_COLUMNS.iter().map(|c| c.to_string()).collect();
    let count = |n: u32| Some(Value::Int(n as i64));
    let rows = stats
        .iter()
        .map(|s| {
            vec![
                Some(Value::Text(s.team.clone())),
                count(s.home_games),
                count(s.home_wins),
                count(s.home_draws),
                Some(Value::Int(s.home_goals)),
                count(s.away_games),
                count(s.away_wins),
                count(s.away_draws),
                Some(Value::Int(s.away_goals)),
                count(s.total_games),
                count(s.total_wins),
                count(s.total_draws),
                Some(Value::Int(s.total_goals)),
                s.win_ratio.map(Value::Float),
                s.draw_ratio.map(Value::Float),
                s.home_win_ratio.map(Value::Float),
                s.away_win_ratio.map(Value::Float),
                s.home_goal_ratio.map(Value::Float),
                s.away_goal_ratio.map(Value::Float),
                s.total_goal_ratio.map(Value::Float),
            ]
        })
        .collect();
    Table::from_rows(columns, rows)
}
