use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use football_data::config::CollectorConfig;
use football_data::team_stats::TeamStats;
use football_data::DataCollector;

const DEFAULT_LEAGUE: &str = "serie_a";
const STATS_PREVIEW_ROWS: usize = 5;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let league = arg_value(&args, "league").unwrap_or_else(|| DEFAULT_LEAGUE.to_string());
    let year_start = parse_year(&args, "from")?.unwrap_or(2003);
    let year_end = parse_year(&args, "to")?.unwrap_or(year_start);
    let write_csv = has_flag(&args, "write-csv");

    let mut config = CollectorConfig::from_env();
    if let Some(dir) = arg_value(&args, "export-dir") {
        config.export_dir = PathBuf::from(dir);
    }

    let mut collector = DataCollector::with_config(&league, config)?;
    let report = collector.collect_seasons(year_start, year_end, |p| {
        println!("[{}/{}] fetching season {}", p.current, p.total, p.season);
    })?;

    println!("League: {}", report.league);
    println!(
        "Seasons: {}/{}",
        report.seasons_succeeded(),
        report.seasons_total
    );
    println!(
        "Rows: {} (skipped {})",
        report.rows(),
        report.skipped_rows()
    );
    if !report.issues.is_empty() {
        println!("Unavailable: {}", report.issues.len());
        for issue in report.issues.iter().take(8) {
            println!(" - {issue}");
        }
    }

    let table = collector
        .merge(report.tables)
        .context("no season could be fetched")?;
    println!("Merged table: {} rows x {} columns", table.len(), table.width());

    if write_csv {
        let path = collector.export(&table)?;
        println!("Data written to {}", path.display());
    }

    let stats_json = arg_value(&args, "stats-json").map(PathBuf::from);
    if has_flag(&args, "stats") || stats_json.is_some() {
        let stats = DataCollector::compute_team_statistics(&table)?;
        print_stats(&stats);
        if let Some(path) = stats_json {
            let json = serde_json::to_string_pretty(&stats).context("serialize team stats")?;
            std::fs::write(&path, json)
                .with_context(|| format!("write team stats {}", path.display()))?;
            println!("Team statistics written to {}", path.display());
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("football_data=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_stats(stats: &[TeamStats]) {
    println!(
        "{:<18} {:>5} {:>5} {:>5} {:>6} {:>6} {:>6}",
        "Team", "P", "W", "D", "GF", "Win%", "Draw%"
    );
    for s in stats.iter().take(STATS_PREVIEW_ROWS) {
        println!(
            "{:<18} {:>5} {:>5} {:>5} {:>6} {:>6} {:>6}",
            s.team,
            s.total_games,
            s.total_wins,
            s.total_draws,
            s.total_goals,
            fmt_ratio(s.win_ratio),
            fmt_ratio(s.draw_ratio)
        );
    }
    if stats.len() > STATS_PREVIEW_ROWS {
        println!("... {} more teams", stats.len() - STATS_PREVIEW_ROWS);
    }
}

fn fmt_ratio(ratio: Option<f64>) -> String {
    ratio
        .map(|r| format!("{:.1}", r * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}

fn parse_year(args: &[String], name: &str) -> Result<Option<i32>> {
    let Some(raw) = arg_value(args, name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<i32>()
        .map(Some)
        .map_err(|_| anyhow!("--{name} expects a year, got '{raw}'"))
}

fn has_flag(args: &[String], name: &str) -> bool {
    let flag = format!("--{name}");
    args.iter().any(|arg| *arg == flag)
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let flag = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
