use crate::Rule;
use zenbridge_common::types::{MetricCheck, RuleKind, SampleWindow, Verdict};

/// Breaches when more than `allowed` samples in the window are the
/// `None` sentinel, meaning the series has effectively stopped
/// reporting. A breach gates the check's other rules for the run.
pub struct NoneCountRule {
    pub allowed: usize,
}

impl Rule for NoneCountRule {
    fn kind(&self) -> RuleKind {
        RuleKind::None
    }

    fn evaluate(&self, window: &SampleWindow) -> Verdict {
        let count = window.none_count();
        if count > self.allowed {
            Verdict::Breach(count as i64)
        } else {
            Verdict::Ok
        }
    }

    fn breach_message(&self, check: &MetricCheck, value: i64) -> String {
        format!(
            "{} is reporting too many 'None' values ({value}) [ {} ]",
            check.title, check.query
        )
    }
}
