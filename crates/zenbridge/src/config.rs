use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashSet;
use zenbridge_common::types::MetricCheck;

#[derive(Debug, Deserialize)]
pub struct BridgeConfig {
    pub graphite: GraphiteConfig,
    pub zenoss: ZenossConfig,
    #[serde(default)]
    pub bridge: RunConfig,
    #[serde(default)]
    pub checks: Vec<MetricCheck>,
}

#[derive(Debug, Deserialize)]
pub struct GraphiteConfig {
    pub url: String,
    /// Optional HTTP basic auth, for installs that protect /render.
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Trailing duration of samples each rule evaluates.
    #[serde(default = "default_monitor_window_secs")]
    pub monitor_window_secs: u64,
    /// How much history the bulk query requests. Defaults to twice the
    /// monitoring window so windowed functions inside a target have
    /// history to work with.
    #[serde(default)]
    pub lookback_secs: Option<u64>,
}

impl GraphiteConfig {
    pub fn lookback_secs(&self) -> u64 {
        self.lookback_secs
            .unwrap_or(self.monitor_window_secs * 2)
    }
}

#[derive(Debug, Deserialize)]
pub struct ZenossConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    /// Device the bridge's events are filed under.
    #[serde(default = "default_device")]
    pub device: String,
    #[serde(default = "default_event_class")]
    pub event_class: String,
}

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// `None` samples tolerated per window before the series counts as
    /// not reporting.
    #[serde(default = "default_allowed_none")]
    pub allowed_none: usize,
    /// Consecutive failed bulk queries tolerated before one fatal
    /// notification is sent and the bridge exits.
    #[serde(default = "default_max_backend_failures")]
    pub max_backend_failures: u32,
    /// Seconds between runs. Absent means one run per invocation
    /// (cron mode).
    #[serde(default)]
    pub interval_secs: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            allowed_none: default_allowed_none(),
            max_backend_failures: default_max_backend_failures(),
            interval_secs: None,
        }
    }
}

fn default_monitor_window_secs() -> u64 {
    600
}

fn default_device() -> String {
    "graphite".to_string()
}

fn default_event_class() -> String {
    "/Status".to_string()
}

fn default_state_file() -> String {
    "/tmp/zenbridge-alerts.state".to_string()
}

fn default_allowed_none() -> usize {
    zenbridge_alert::engine::DEFAULT_ALLOWED_NONE
}

fn default_max_backend_failures() -> u32 {
    2
}

impl BridgeConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Credential and check validation. Failing here means no run ever
    /// starts and no state is touched.
    fn validate(&self) -> anyhow::Result<()> {
        if self.graphite.url.trim().is_empty() {
            bail!("graphite.url must be set");
        }
        if self.zenoss.url.trim().is_empty() {
            bail!("zenoss.url must be set");
        }
        if self.zenoss.username.trim().is_empty() {
            bail!("zenoss.username must be set");
        }
        if self.zenoss.password.trim().is_empty() {
            bail!("zenoss.password must be set");
        }
        let mut titles = HashSet::new();
        for check in &self.checks {
            if check.title.trim().is_empty() {
                bail!("every check needs a title");
            }
            if !titles.insert(check.title.as_str()) {
                bail!("duplicate check title: {}", check.title);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [graphite]
        url = "http://graphite.example:81"

        [zenoss]
        url = "http://zenoss.example:8080"
        username = "admin"
        password = "secret"

        [[checks]]
        title = "API Latency"
        query = "sumSeries(api.*.latency)"
        severity = 4
        max = 2000
    "#;

    fn parse(content: &str) -> anyhow::Result<BridgeConfig> {
        let config: BridgeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.graphite.monitor_window_secs, 600);
        assert_eq!(config.graphite.lookback_secs(), 1200);
        assert_eq!(config.bridge.allowed_none, 4);
        assert_eq!(config.bridge.max_backend_failures, 2);
        assert_eq!(config.bridge.interval_secs, None);
        assert_eq!(config.zenoss.event_class, "/Status");

        let check = &config.checks[0];
        assert_eq!(check.max, Some(2000));
        assert_eq!(check.min, None);
        assert_eq!(check.roc, None);
        assert_eq!(u8::from(check.severity), 4);
    }

    #[test]
    fn explicit_lookback_wins() {
        let content = MINIMAL.replace(
            "url = \"http://graphite.example:81\"",
            "url = \"http://graphite.example:81\"\nlookback_secs = 3600",
        );
        let config = parse(&content).unwrap();
        assert_eq!(config.graphite.lookback_secs(), 3600);
    }

    #[test]
    fn missing_zenoss_password_fails_construction() {
        let content = MINIMAL.replace("password = \"secret\"", "password = \"\"");
        assert!(parse(&content).is_err());
    }

    #[test]
    fn duplicate_check_titles_fail_construction() {
        let content = format!(
            "{MINIMAL}\n[[checks]]\ntitle = \"API Latency\"\nquery = \"other\"\nseverity = 3\n"
        );
        assert!(parse(&content).is_err());
    }

    #[test]
    fn out_of_range_severity_fails() {
        let content = MINIMAL.replace("severity = 4", "severity = 9");
        assert!(parse(&content).is_err());
    }
}
