use crate::Rule;
use zenbridge_common::types::{MetricCheck, RuleKind, SampleWindow, Verdict};

/// Breaches when the spread (`max - min`) of the window's values
/// strictly exceeds the threshold.
pub struct RateOfChangeRule {
    pub threshold: i64,
}

impl Rule for RateOfChangeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::Roc
    }

    fn evaluate(&self, window: &SampleWindow) -> Verdict {
        let values = window.numeric_values();
        match (values.iter().min(), values.iter().max()) {
            (Some(min), Some(max)) if max - min > self.threshold => Verdict::Breach(max - min),
            _ => Verdict::Ok,
        }
    }

    fn breach_message(&self, check: &MetricCheck, value: i64) -> String {
        format!(
            "{} moved by {value} inside the monitoring window, over its allowed rate of change of {} [ {} ]",
            check.title, self.threshold, check.query
        )
    }
}
