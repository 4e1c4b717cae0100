use crate::Rule;
use zenbridge_common::types::{MetricCheck, RuleKind, SampleWindow, Verdict};

/// Breaches when the window's maximum strictly exceeds the threshold.
pub struct MaxRule {
    pub threshold: i64,
}

impl Rule for MaxRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Max
    }

    fn evaluate(&self, window: &SampleWindow) -> Verdict {
        // No values after excluding None: no maximum, no verdict.
        match window.numeric_values().into_iter().max() {
            Some(max) if max > self.threshold => Verdict::Breach(max),
            _ => Verdict::Ok,
        }
    }

    fn breach_message(&self, check: &MetricCheck, value: i64) -> String {
        format!(
            "{} is over its threshold of {} at {value} [ {} ]",
            check.title, self.threshold, check.query
        )
    }
}
