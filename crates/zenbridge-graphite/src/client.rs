use crate::error::{GraphiteError, Result};
use crate::parse;
use zenbridge_common::types::{MetricCheck, SeriesStore};

/// Executes the one bulk render query per run.
///
/// Every configured check's target is wrapped in `alias(...)` with its
/// derived series identifier, so the parsed response keys back to the
/// check no matter how complex the underlying expression is.
pub struct GraphiteClient {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    lookback_secs: u64,
    monitor_window_secs: u64,
    client: reqwest::Client,
}

impl GraphiteClient {
    pub fn new(
        base_url: &str,
        username: Option<String>,
        password: Option<String>,
        lookback_secs: u64,
        monitor_window_secs: u64,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            username,
            password,
            lookback_secs,
            monitor_window_secs,
            client: reqwest::Client::new(),
        }
    }

    /// The bulk render URL covering every configured check.
    pub fn render_url(&self, checks: &[MetricCheck]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&format!("{}/render/", self.base_url))
            .map_err(|e| GraphiteError::InvalidUrl(e.to_string()))?;
        {
            let mut params = url.query_pairs_mut();
            params.append_pair("from", &format!("-{}s", self.lookback_secs));
            params.append_pair("rawData", "true");
            for check in checks {
                params.append_pair(
                    "target",
                    &format!("alias({},\"{}\")", check.query, check.series_id()),
                );
            }
        }
        Ok(url)
    }

    /// Fetches and parses all configured series in one request.
    ///
    /// # Errors
    ///
    /// Any transport error, non-success status, or fully unparseable
    /// body; the caller records each as one consecutive failure.
    pub async fn fetch_series(&self, checks: &[MetricCheck]) -> Result<SeriesStore> {
        let url = self.render_url(checks)?;
        let mut request = self.client.get(url);
        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Graphite returned non-success status");
            return Err(GraphiteError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let store = parse::parse_response(&body, self.monitor_window_secs)?;
        tracing::debug!(series = store.len(), "bulk query parsed");
        Ok(store)
    }
}

/// Counts consecutive failed bulk queries.
///
/// Owned by the caller and carried across runs of the evaluation loop;
/// any successful fetch resets it.
#[derive(Debug)]
pub struct FailureTracker {
    consecutive: u32,
    max: u32,
}

impl FailureTracker {
    pub fn new(max: u32) -> Self {
        Self {
            consecutive: 0,
            max,
        }
    }

    /// Records one failure; returns `true` once the consecutive count
    /// exceeds the configured maximum.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive += 1;
        self.consecutive > self.max
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}
