use crate::config::BridgeConfig;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use tokio::signal;
use tokio::time::{interval, Duration};
use zenbridge_alert::engine::BridgeEngine;
use zenbridge_alert::state::StateFile;
use zenbridge_common::types::{Notification, Severity};
use zenbridge_graphite::client::{FailureTracker, GraphiteClient};
use zenbridge_zenoss::zenoss::ZenossNotifier;
use zenbridge_zenoss::Notifier;

/// What a single run amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Evaluated every check and persisted a new state generation.
    Completed,
    /// The bulk query failed under the failure maximum; evaluation was
    /// skipped and the previous state file left in place.
    BackendFailed,
}

/// Wires the collaborators together and owns the run loop.
///
/// One run: load previous state, one bulk fetch, evaluate every check
/// in configuration order, deliver the notices, persist the new state.
/// The failure tracker outlives individual runs so consecutive backend
/// failures across the interval loop escalate.
pub struct Bridge {
    config: BridgeConfig,
    graphite: GraphiteClient,
    notifier: Box<dyn Notifier>,
    engine: BridgeEngine,
    state_file: StateFile,
    failures: FailureTracker,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let graphite = GraphiteClient::new(
            &config.graphite.url,
            config.graphite.username.clone(),
            config.graphite.password.clone(),
            config.graphite.lookback_secs(),
            config.graphite.monitor_window_secs,
        );
        let notifier = Box::new(ZenossNotifier::new(
            &config.zenoss.url,
            &config.zenoss.username,
            &config.zenoss.password,
            &config.zenoss.device,
            &config.zenoss.event_class,
        ));
        let engine = BridgeEngine::new(config.bridge.allowed_none);
        let state_file = StateFile::new(&config.bridge.state_file);
        let failures = FailureTracker::new(config.bridge.max_backend_failures);
        Self {
            config,
            graphite,
            notifier,
            engine,
            state_file,
            failures,
        }
    }

    /// Runs once, or forever on an interval when configured.
    pub async fn run(&mut self) -> Result<()> {
        let Some(secs) = self.config.bridge.interval_secs else {
            self.run_once().await?;
            return Ok(());
        };

        tracing::info!(interval_secs = secs, "starting evaluation loop");
        let mut tick = interval(Duration::from_secs(secs));
        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.run_once().await?;
                }
                _ = signal::ctrl_c() => {
                    tracing::info!("shutting down");
                    return Ok(());
                }
            }
        }
    }

    pub async fn run_once(&mut self) -> Result<RunStatus> {
        let previous = self.state_file.load();
        tracing::info!(
            checks = self.config.checks.len(),
            previously_active = previous.len(),
            "starting run"
        );

        let series = match self.graphite.fetch_series(&self.config.checks).await {
            Ok(series) => {
                self.failures.record_success();
                series
            }
            Err(e) => {
                tracing::warn!(error = %e, "bulk query failed");
                if self.failures.record_failure() {
                    let consecutive = self.failures.consecutive();
                    self.send(&backend_failure_notice(consecutive)).await;
                    bail!("{consecutive} consecutive Graphite failures, giving up");
                }
                tracing::warn!(
                    consecutive = self.failures.consecutive(),
                    "skipping evaluation, previous alert state left in place"
                );
                return Ok(RunStatus::BackendFailed);
            }
        };

        let stamp = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let outcome = self
            .engine
            .evaluate(&self.config.checks, &series, &previous, &stamp);
        tracing::info!(
            active = outcome.state.len(),
            notices = outcome.notices.len(),
            "run evaluated"
        );

        for notice in &outcome.notices {
            self.send(notice).await;
        }

        self.state_file
            .save(&outcome.state)
            .context("persisting alert state")?;
        Ok(RunStatus::Completed)
    }

    async fn send(&self, notification: &Notification) {
        // Delivery failure must not block the state write; the alert is
        // still recorded and the next transition will be reported.
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::error!(
                notifier = self.notifier.name(),
                component = %notification.component,
                error = %e,
                "failed to deliver notification"
            );
        }
    }
}

fn backend_failure_notice(consecutive: u32) -> Notification {
    Notification {
        component: "zenbridge".to_string(),
        message: format!(
            "The bulk queries to Graphite are failing ({consecutive} consecutive); the bridge is giving up"
        ),
        severity: Severity::Critical,
        metric: None,
        value: None,
    }
}
