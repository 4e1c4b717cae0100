use crate::Rule;
use zenbridge_common::types::{MetricCheck, RuleKind, SampleWindow, Verdict};

/// Breaches when the window's minimum is strictly below the threshold.
pub struct MinRule {
    pub threshold: i64,
}

impl Rule for MinRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Min
    }

    fn evaluate(&self, window: &SampleWindow) -> Verdict {
        // An empty window must not read as a minimum of 0, which would
        // spuriously breach any positive threshold.
        match window.numeric_values().into_iter().min() {
            Some(min) if min < self.threshold => Verdict::Breach(min),
            _ => Verdict::Ok,
        }
    }

    fn breach_message(&self, check: &MetricCheck, value: i64) -> String {
        format!(
            "{} is under its threshold of {} at {value} [ {} ]",
            check.title, self.threshold, check.query
        )
    }
}
