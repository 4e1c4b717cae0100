use crate::state::AlertState;
use zenbridge_common::types::{AlertKey, Verdict};

/// What one verdict did to one alert-key lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Entered breach this run; a raise notification is owed.
    Raised { value: i64 },
    /// Still in breach; presence in the persisted state is the
    /// re-raise, no duplicate notification is sent.
    StillActive { value: i64 },
    /// Left breach; a clear notification is owed, exactly once.
    Cleared,
    /// The series never appeared in the response; alerted every run it
    /// stays missing, with no state change.
    Missing,
}

/// Compares this run's verdicts against the previous generation and
/// accumulates the current one.
///
/// Exactly one [`observe`](Reconciler::observe) per alert key per run;
/// a key observed as `Ok` that was never previously active produces no
/// transition at all.
pub struct Reconciler<'a> {
    previous: &'a AlertState,
    current: AlertState,
    run_stamp: String,
}

impl<'a> Reconciler<'a> {
    pub fn new(previous: &'a AlertState, run_stamp: impl Into<String>) -> Self {
        Self {
            previous,
            current: AlertState::new(),
            run_stamp: run_stamp.into(),
        }
    }

    pub fn observe(&mut self, key: AlertKey, verdict: Verdict) -> Option<Transition> {
        match verdict {
            Verdict::Breach(value) => {
                let was_active = self.previous.contains(&key);
                // The state file records when the alert first fired, so
                // a continuing breach keeps its original timestamp.
                let stamp = self
                    .previous
                    .get(&key)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.run_stamp.clone());
                self.current.insert(key, stamp);
                Some(if was_active {
                    Transition::StillActive { value }
                } else {
                    Transition::Raised { value }
                })
            }
            Verdict::Ok => self
                .previous
                .contains(&key)
                .then_some(Transition::Cleared),
            Verdict::MetricMissing => Some(Transition::Missing),
        }
    }

    /// Copies a key's previous entry into the current generation
    /// unchanged, for rules that were gated off this run and so were
    /// neither breached nor cleared.
    pub fn carry_forward(&mut self, key: &AlertKey) {
        if let Some(stamp) = self.previous.get(key) {
            self.current.insert(key.clone(), stamp.to_string());
        }
    }

    /// The current generation; replaces the previous one wholesale on
    /// persist.
    pub fn into_state(self) -> AlertState {
        self.current
    }
}
