use std::path::PathBuf;

use crate::league::DEFAULT_ARCHIVE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub export_dir: PathBuf,
    pub user_agent: String,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ARCHIVE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            export_dir: PathBuf::from("."),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CollectorConfig {
    /// Reads `FOOTBALL_DATA_*` overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(base) = non_empty(lookup("FOOTBALL_DATA_BASE_URL")) {
            cfg.base_url = base;
        }
        if let Some(secs) = lookup("FOOTBALL_DATA_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
        {
            cfg.timeout_secs = secs.max(1);
        }
        if let Some(dir) = non_empty(lookup("FOOTBALL_DATA_EXPORT_DIR")) {
            cfg.export_dir = PathBuf::from(dir);
        }
        if let Some(agent) = non_empty(lookup("FOOTBALL_DATA_USER_AGENT")) {
            cfg.user_agent = agent;
        }
        cfg
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
