use crate::reconcile::{Reconciler, Transition};
use crate::rules::{self, NoneCountRule};
use crate::state::AlertState;
use crate::Rule;
use zenbridge_common::types::{
    AlertKey, MetricCheck, Notification, SeriesStore, Severity, Verdict,
};

/// Default number of `None` samples tolerated before a series is
/// considered to have stopped reporting.
pub const DEFAULT_ALLOWED_NONE: usize = 4;

/// Everything one run decided: the next state generation and the
/// notifications owed for it, in check/rule order.
#[derive(Debug)]
pub struct RunOutcome {
    pub state: AlertState,
    pub notices: Vec<Notification>,
}

/// Drives one run's evaluation over the parsed series store.
///
/// The engine is pure over its inputs and performs no I/O, so a whole
/// run's decisions can be exercised from a response string and a
/// previous state alone.
pub struct BridgeEngine {
    allowed_none: usize,
}

impl BridgeEngine {
    pub fn new(allowed_none: usize) -> Self {
        Self { allowed_none }
    }

    pub fn evaluate(
        &self,
        checks: &[MetricCheck],
        series: &SeriesStore,
        previous: &AlertState,
        run_stamp: &str,
    ) -> RunOutcome {
        let mut reconciler = Reconciler::new(previous, run_stamp);
        let mut notices = Vec::new();

        for check in checks {
            let id = check.series_id();
            let Some(window) = series.get(&id) else {
                report_missing(check, &mut reconciler, &mut notices);
                continue;
            };

            let none_rule = NoneCountRule {
                allowed: self.allowed_none,
            };
            let none_verdict = none_rule.evaluate(window);
            apply(check, &none_rule, none_verdict, &mut reconciler, &mut notices);

            if none_verdict.is_breach() {
                // The series has effectively stopped reporting. The
                // threshold rules are not evaluated, and their previous
                // state is carried forward untouched: not evaluated
                // means neither raised nor cleared.
                for rule in rules::for_check(check) {
                    reconciler.carry_forward(&AlertKey::new(&check.title, rule.kind()));
                }
                continue;
            }

            for rule in rules::for_check(check) {
                let verdict = rule.evaluate(window);
                apply(check, rule.as_ref(), verdict, &mut reconciler, &mut notices);
            }
        }

        RunOutcome {
            state: reconciler.into_state(),
            notices,
        }
    }
}

fn apply(
    check: &MetricCheck,
    rule: &dyn Rule,
    verdict: Verdict,
    reconciler: &mut Reconciler<'_>,
    notices: &mut Vec<Notification>,
) {
    let key = AlertKey::new(&check.title, rule.kind());
    match reconciler.observe(key.clone(), verdict) {
        Some(Transition::Raised { value }) => {
            tracing::info!(key = %key, value, "raising alert");
            notices.push(Notification {
                component: key.to_string(),
                message: rule.breach_message(check, value),
                severity: check.severity,
                metric: Some(check.query.clone()),
                value: Some(value),
            });
        }
        Some(Transition::StillActive { value }) => {
            tracing::info!(key = %key, value, "alert still active, not re-sending");
        }
        Some(Transition::Cleared) => {
            tracing::info!(key = %key, "clearing alert");
            notices.push(Notification {
                component: key.to_string(),
                message: format!("Clearing {key}"),
                severity: Severity::Clear,
                metric: Some(check.query.clone()),
                value: None,
            });
        }
        // Missing verdicts never route through here; report_missing
        // composes those notices directly.
        Some(Transition::Missing) => {}
        None => {
            tracing::debug!(key = %key, "ok, nothing previously raised");
        }
    }
}

fn report_missing(
    check: &MetricCheck,
    reconciler: &mut Reconciler<'_>,
    notices: &mut Vec<Notification>,
) {
    for rule in rules::for_check(check) {
        let key = AlertKey::new(&check.title, rule.kind());
        // Reported every run the series stays missing; never persisted,
        // so a reappearing series starts from a clean slate.
        reconciler.observe(key.clone(), Verdict::MetricMissing);
        tracing::warn!(key = %key, metric = %check.query, "series missing from response");
        notices.push(Notification {
            component: check.title.clone(),
            message: format!(
                "{} has no data in the Graphite response; the {} rule cannot be evaluated [ {} ]",
                check.title,
                rule.kind(),
                check.query
            ),
            severity: Severity::Critical,
            metric: Some(check.query.clone()),
            value: None,
        });
    }
}
