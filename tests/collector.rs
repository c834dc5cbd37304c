use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use football_data::cities::CityTable;
use football_data::config::CollectorConfig;
use football_data::http_client::{FetchOutcome, SeasonSource};
use football_data::ids::SequentialIds;
use football_data::table::Value;
use football_data::{DataCollector, DataError, SeasonIssue};

const BASE: &str = "http://archive.test";

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FakeArchive {
    responses: HashMap<String, FetchOutcome>,
}

impl FakeArchive {
    fn epl() -> Self {
        let responses = HashMap::from([
            (
                format!("{BASE}/mmz4281/1920/E0.csv"),
                FetchOutcome::Body(read_fixture("epl_1920.csv").into_bytes()),
            ),
            (
                format!("{BASE}/mmz4281/2021/E0.csv"),
                FetchOutcome::Body(read_fixture("epl_2021.csv").into_bytes()),
            ),
            (format!("{BASE}/mmz4281/2122/E0.csv"), FetchOutcome::Status(404)),
        ]);
        Self { responses }
    }

    fn answering_2020_with(body: &str) -> Self {
        let responses = HashMap::from([(
            format!("{BASE}/mmz4281/2021/E0.csv"),
            FetchOutcome::Body(body.as_bytes().to_vec()),
        )]);
        Self { responses }
    }

    fn unreachable() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }
}

impl SeasonSource for FakeArchive {
    fn fetch(&self, url: &str) -> FetchOutcome {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| FetchOutcome::Transport("connection refused".to_string()))
    }
}

fn config() -> CollectorConfig {
    CollectorConfig {
        base_url: BASE.to_string(),
        ..CollectorConfig::default()
    }
}

fn collector(source: FakeArchive) -> DataCollector {
    DataCollector::with_source("epl", config(), Box::new(source), CityTable::builtin().clone())
        .expect("epl is a valid league")
        .with_ids(Box::new(SequentialIds::default()))
}

#[test]
fn skips_unavailable_seasons_and_keeps_the_rest() {
    let dc = collector(FakeArchive::epl());
    let mut progress = Vec::new();
    let report = dc
        .collect_seasons(2019, 2022, |p| progress.push((p.current, p.total, p.season)))
        .unwrap();

    assert_eq!(report.seasons_total, 4);
    assert_eq!(report.seasons_succeeded(), 2);
    assert_eq!(report.rows(), 7);
    assert_eq!(report.skipped_rows(), 2);
    assert_eq!(
        progress.last().cloned(),
        Some((4, 4, "2022/2023".to_string()))
    );
    assert_eq!(
        report.issues,
        vec![
            SeasonIssue::Unavailable {
                year: 2021,
                status: 404
            },
            SeasonIssue::FetchFailed {
                year: 2022,
                cause: "connection refused".to_string()
            },
        ]
    );
}

#[test]
fn collect_data_merges_seasons_in_year_order() {
    let mut dc = collector(FakeArchive::epl());
    let table = dc.collect_data(2019, 2021, false).expect("two seasons available");

    assert_eq!(table.len(), 7);
    let columns = table.columns().iter().map(String::as_str).collect::<Vec<_>>();
    assert_eq!(
        columns,
        vec![
            "game_id", "Div", "Date", "HomeTeam", "TG", "AwayTeam", "FTHG", "FTAG", "FTR",
            "Referee", "Time", "HTHG", "HTAG", "HTR", "season", "city_name", "lat", "lon",
        ]
    );

    assert_eq!(table.get(0, "game_id"), Some(&Value::from("00000000")));
    assert_eq!(table.get(6, "game_id"), Some(&Value::from("00000006")));
    assert_eq!(table.get(0, "Div"), Some(&Value::from("epl")));
    assert_eq!(table.get(0, "HomeTeam"), Some(&Value::from("Liverpool")));
    assert_eq!(table.get(4, "HomeTeam"), Some(&Value::from("Fulham")));

    // The older season has no half-time columns.
    assert_eq!(table.get(0, "HTR"), None);
    assert_eq!(table.get(4, "HTR"), Some(&Value::from("A")));
}

#[test]
fn derived_columns_follow_their_rules() {
    let mut dc = collector(FakeArchive::epl());
    let table = dc.collect_data(2019, 2020, false).unwrap();

    for row in 0..table.len() {
        let home = table.get(row, "FTHG").and_then(Value::as_i64).unwrap();
        let away = table.get(row, "FTAG").and_then(Value::as_i64).unwrap();
        assert_eq!(table.get(row, "TG"), Some(&Value::Int(home + away)));
    }

    let seasons = table
        .column("season")
        .unwrap()
        .map(|v| v.unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        seasons,
        vec![
            "2019/2020", "2019/2020", "2019/2020", "2019/2020", "2020/2021", "2020/2021",
            "2020/2021",
        ]
    );
    assert_eq!(table.get(3, "Date").map(|d| d.to_string()), Some("2020-02-01".to_string()));

    // Arsenal at home is mapped; Unmapped FC at home is not.
    assert_eq!(table.get(2, "city_name"), Some(&Value::from("London")));
    assert!(table.get(2, "lat").and_then(Value::as_f64).is_some());
    assert!(table.get(2, "lon").and_then(Value::as_f64).is_some());
    assert_eq!(table.get(3, "city_name"), None);
    assert_eq!(table.get(3, "lat"), None);
    assert_eq!(table.get(3, "lon"), None);
}

#[test]
fn unreachable_archive_yields_empty_input_error() {
    let mut dc = collector(FakeArchive::unreachable());
    let report = dc.collect_seasons(2020, 2020, |_| {}).unwrap();
    assert!(report.tables.is_empty());
    assert_eq!(report.issues.len(), 1);
    assert!(matches!(dc.merge(report.tables), Err(DataError::EmptyInput)));

    assert!(matches!(
        dc.collect_data(2020, 2020, false),
        Err(DataError::EmptyInput)
    ));
}

#[test]
fn seasons_without_rows_yield_empty_input_error() {
    for body in [
        "",
        "Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n",
        "Div,Date,HomeTeam,AwayTeam,FTHG,FTAG,FTR\n,,,,,,\n",
    ] {
        let mut dc = collector(FakeArchive::answering_2020_with(body));
        let report = dc.collect_seasons(2020, 2020, |_| {}).unwrap();
        assert_eq!(report.seasons_succeeded(), 1);
        assert_eq!(report.rows(), 0);
        assert!(
            matches!(dc.collect_data(2020, 2020, false), Err(DataError::EmptyInput)),
            "body {body:?} should not merge into a table"
        );
    }
}

#[test]
fn empty_season_alongside_real_one_still_merges() {
    let mut archive = FakeArchive::epl();
    archive.responses.insert(
        format!("{BASE}/mmz4281/2122/E0.csv"),
        FetchOutcome::Body(b"Div,Date,HomeTeam\n".to_vec()),
    );
    let mut dc = collector(archive);
    let table = dc.collect_data(2020, 2021, false).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.columns()[0], "game_id");
}

#[test]
fn out_of_range_years_are_rejected_before_fetching() {
    let mut dc = collector(FakeArchive::epl());
    for (start, end) in [(i32::MAX, i32::MAX), (i32::MIN, i32::MAX), (2020, 10_000)] {
        let err = dc
            .collect_seasons(start, end, |_| panic!("no season should be requested"))
            .err()
            .expect("range should be rejected");
        assert!(matches!(err, DataError::InvalidYearRange { .. }));
        assert!(matches!(
            dc.collect_data(start, end, false),
            Err(DataError::InvalidYearRange { .. })
        ));
    }
}

#[test]
fn reversed_range_fetches_nothing() {
    let mut dc = collector(FakeArchive::epl());
    let report = dc
        .collect_seasons(2021, 2019, |_| panic!("no season should be requested"))
        .unwrap();
    assert_eq!(report.seasons_total, 0);
    assert!(matches!(
        dc.collect_data(2021, 2019, false),
        Err(DataError::EmptyInput)
    ));
}

#[test]
fn invalid_league_is_rejected_up_front() {
    let err = DataCollector::with_source(
        "bundesliga",
        config(),
        Box::new(FakeArchive::epl()),
        CityTable::default(),
    )
    .err()
    .expect("unknown league should fail");
    assert!(matches!(err, DataError::InvalidLeague(name) if name == "bundesliga"));
}

#[test]
fn repeated_collection_matches_except_game_ids() {
    let mut first = DataCollector::with_source(
        "epl",
        config(),
        Box::new(FakeArchive::epl()),
        CityTable::builtin().clone(),
    )
    .unwrap();
    let mut second = collector(FakeArchive::epl());

    let a = first.collect_data(2019, 2020, false).unwrap();
    let b = second.collect_data(2019, 2020, false).unwrap();
    assert_eq!(a.columns(), b.columns());

    let without_ids = a
        .columns()
        .iter()
        .filter(|c| *c != "game_id")
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(a.select(&without_ids), b.select(&without_ids));
    assert!(a.column("game_id").unwrap().all(|id| id.is_some_and(|v| v.to_string().len() == 8)));
}

#[test]
fn write_csv_exports_league_file() {
    let dir = std::env::temp_dir().join(format!("football_data_export_{}", std::process::id()));
    let cfg = CollectorConfig {
        export_dir: dir.clone(),
        ..config()
    };
    let mut dc = DataCollector::with_source(
        "epl",
        cfg,
        Box::new(FakeArchive::epl()),
        CityTable::builtin().clone(),
    )
    .unwrap()
    .with_ids(Box::new(SequentialIds::default()));

    let table = dc.collect_data(2019, 2019, true).unwrap();
    let written = fs::read_to_string(dir.join("epl.csv")).expect("export should exist");
    let mut lines = written.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("game_id,Div,Date,HomeTeam,TG,AwayTeam"));
    assert_eq!(lines.count(), table.len());
    assert!(written.contains("00000000,epl,2019-08-09,Liverpool,5,Norwich"));

    fs::remove_dir_all(&dir).ok();
}
