pub mod max;
pub mod min;
pub mod none_count;
pub mod rate_of_change;

pub use max::MaxRule;
pub use min::MinRule;
pub use none_count::NoneCountRule;
pub use rate_of_change::RateOfChangeRule;

use crate::Rule;
use zenbridge_common::types::MetricCheck;

/// The threshold rules a check configures, in evaluation order.
///
/// The none-count gate is not part of this list; the engine always runs
/// it first and it does not depend on any configured threshold.
pub fn for_check(check: &MetricCheck) -> Vec<Box<dyn Rule>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();
    if let Some(threshold) = check.max {
        rules.push(Box::new(MaxRule { threshold }));
    }
    if let Some(threshold) = check.min {
        rules.push(Box::new(MinRule { threshold }));
    }
    if let Some(threshold) = check.roc {
        rules.push(Box::new(RateOfChangeRule { threshold }));
    }
    rules
}
