use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use reqwest::header::USER_AGENT;

use crate::config::CollectorConfig;
use crate::error::Result;

/// Result of a single season request. Only `Body` carries data; the other
/// variants make the season unavailable without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(Vec<u8>),
    Status(u16),
    Transport(String),
}

/// Something that can retrieve the raw CSV bytes behind a season URL.
pub trait SeasonSource {
    fn fetch(&self, url: &str) -> FetchOutcome;
}

pub struct HttpSeasonSource {
    client: Client,
    user_agent: String,
}

impl HttpSeasonSource {
    pub fn new(cfg: &CollectorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            user_agent: cfg.user_agent.clone(),
        })
    }
}

impl SeasonSource for HttpSeasonSource {
    fn fetch(&self, url: &str) -> FetchOutcome {
        let resp = match self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
        {
            Ok(resp) => resp,
            Err(err) => return FetchOutcome::Transport(err.to_string()),
        };
        let status = resp.status();
        if status != StatusCode::OK {
            return FetchOutcome::Status(status.as_u16());
        }
        match resp.bytes() {
            Ok(body) => FetchOutcome::Body(body.to_vec()),
            Err(err) => FetchOutcome::Transport(format!("failed reading body: {err}")),
        }
    }
}
