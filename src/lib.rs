pub mod cities;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod http_client;
pub mod ids;
pub mod league;
pub mod season_csv;
pub mod table;
pub mod team_stats;
pub mod transform;

pub use collector::{CollectReport, DataCollector, FetchProgress, SeasonIssue};
pub use error::DataError;
pub use league::League;
pub use table::{Table, Value};
pub use team_stats::TeamStats;
