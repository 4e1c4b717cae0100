use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Zenoss event severity, ordered from lowest to highest.
///
/// Severity `0` is reserved for clearing a previously raised event;
/// metric-missing and backend-failure notifications are always sent at
/// [`Severity::Critical`] regardless of a check's configured severity.
///
/// # Examples
///
/// ```
/// use zenbridge_common::types::Severity;
///
/// let sev = Severity::try_from(4u8).unwrap();
/// assert_eq!(sev, Severity::Error);
/// assert_eq!(u8::from(Severity::Clear), 0);
/// assert!(Severity::Critical > Severity::Warning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    Clear,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(Severity::Clear),
            1 => Ok(Severity::Debug),
            2 => Ok(Severity::Info),
            3 => Ok(Severity::Warning),
            4 => Ok(Severity::Error),
            5 => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {value}")),
        }
    }
}

impl From<Severity> for u8 {
    fn from(sev: Severity) -> u8 {
        match sev {
            Severity::Clear => 0,
            Severity::Debug => 1,
            Severity::Info => 2,
            Severity::Warning => 3,
            Severity::Error => 4,
            Severity::Critical => 5,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Clear => write!(f, "clear"),
            Severity::Debug => write!(f, "debug"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// The kind of threshold rule an alert key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleKind {
    None,
    Max,
    Min,
    Roc,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::None => write!(f, "none"),
            RuleKind::Max => write!(f, "max"),
            RuleKind::Min => write!(f, "min"),
            RuleKind::Roc => write!(f, "roc"),
        }
    }
}

impl std::str::FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RuleKind::None),
            "max" => Ok(RuleKind::Max),
            "min" => Ok(RuleKind::Min),
            "roc" => Ok(RuleKind::Roc),
            _ => Err(format!("unknown rule kind: {s}")),
        }
    }
}

/// Composite identity of a check and one rule kind.
///
/// Each rule on a check raises and clears independently, so the state
/// file and the notifier component both use this key rather than the
/// bare check title.
///
/// # Examples
///
/// ```
/// use zenbridge_common::types::{AlertKey, RuleKind};
///
/// let key = AlertKey::new("API Latency", RuleKind::Max);
/// assert_eq!(key.to_string(), "API Latency-max");
/// let parsed: AlertKey = "API Latency-max".parse().unwrap();
/// assert_eq!(parsed, key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlertKey {
    pub title: String,
    pub kind: RuleKind,
}

impl AlertKey {
    pub fn new(title: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            title: title.into(),
            kind,
        }
    }
}

impl std::fmt::Display for AlertKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.title, self.kind)
    }
}

impl std::str::FromStr for AlertKey {
    type Err = String;

    // Titles may contain '-', so the kind is taken from the right.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (title, kind) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("alert key without rule kind: {s}"))?;
        Ok(AlertKey::new(title, kind.parse()?))
    }
}

/// Outcome of evaluating one rule over one sample window.
///
/// `Breach` carries the aggregate that tripped the rule (the observed
/// maximum, minimum, spread, or None count). An empty-after-filtering
/// window never produces a verdict other than `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Breach(i64),
    MetricMissing,
}

impl Verdict {
    pub fn is_breach(&self) -> bool {
        matches!(self, Verdict::Breach(_))
    }
}

/// One configured metric check, immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricCheck {
    /// Human-readable name, unique across the configuration.
    pub title: String,
    /// Graphite target expression; aggregates such as `sumSeries(...)`
    /// are fine, the bridge aliases the whole expression.
    pub query: String,
    pub severity: Severity,
    #[serde(default)]
    pub max: Option<i64>,
    #[serde(default)]
    pub min: Option<i64>,
    #[serde(default)]
    pub roc: Option<i64>,
}

impl MetricCheck {
    /// The identifier this check's series is keyed under in the parsed
    /// response.
    pub fn series_id(&self) -> String {
        crate::id::series_id(&self.query)
    }
}

/// Sample token marking a missing observation in a time bucket.
pub const NONE_SENTINEL: &str = "None";

/// One series' retained sample tokens for the current run, oldest first.
///
/// Samples stay raw strings until a rule needs numbers: the `None`
/// sentinel is counted separately, and everything else is truncated to
/// an integer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleWindow {
    samples: Vec<String>,
}

impl SampleWindow {
    pub fn new(samples: Vec<String>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Number of tokens equal to the `None` sentinel (case-sensitive,
    /// surrounding whitespace ignored).
    pub fn none_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.trim() == NONE_SENTINEL)
            .count()
    }

    /// Non-None tokens as truncated integers. Tokens that parse as
    /// neither the sentinel nor a number are skipped, not coerced to 0.
    pub fn numeric_values(&self) -> Vec<i64> {
        self.samples
            .iter()
            .map(|s| s.trim())
            .filter(|s| *s != NONE_SENTINEL)
            .filter_map(|s| match s.parse::<f64>() {
                Ok(v) => Some(v as i64),
                Err(_) => {
                    tracing::debug!(token = s, "skipping non-numeric sample token");
                    None
                }
            })
            .collect()
    }
}

/// Parsed bulk response: series identifier to retained sample window.
/// Built fresh every run and discarded at run end.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: HashMap<String, SampleWindow>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a window, returning the displaced one if the identifier
    /// was already present. Collision policy (log + last wins) belongs
    /// to the parser.
    pub fn insert(&mut self, id: String, window: SampleWindow) -> Option<SampleWindow> {
        self.series.insert(id, window)
    }

    pub fn get(&self, id: &str) -> Option<&SampleWindow> {
        self.series.get(id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// A fully composed alert or clear instruction for the notifier.
///
/// The notifier boundary does not participate in decision logic; by the
/// time one of these exists the raise/clear/missing decision is final.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Zenoss component the event is filed under: the alert key for
    /// raise/clear pairs, the check title for missing-metric alerts,
    /// or the bridge name for backend failures.
    pub component: String,
    pub message: String,
    pub severity: Severity,
    /// The Graphite expression the event refers to, when there is one.
    pub metric: Option<String>,
    /// The aggregate value that tripped the rule, when there is one.
    pub value: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_key_round_trips_with_dashes_in_title() {
        let key = AlertKey::new("us-east latency", RuleKind::Roc);
        let parsed: AlertKey = key.to_string().parse().unwrap();
        assert_eq!(parsed.title, "us-east latency");
        assert_eq!(parsed.kind, RuleKind::Roc);
    }

    #[test]
    fn alert_key_rejects_unknown_kind() {
        assert!("API Latency-p99".parse::<AlertKey>().is_err());
        assert!("nodash".parse::<AlertKey>().is_err());
    }

    #[test]
    fn none_sentinel_is_case_sensitive_and_trimmed() {
        let window = SampleWindow::new(vec![
            "None".into(),
            " None\n".into(),
            "none".into(),
            "12".into(),
        ]);
        assert_eq!(window.none_count(), 2);
    }

    #[test]
    fn numeric_values_truncate_and_skip_garbage() {
        let window = SampleWindow::new(vec![
            "1500.9".into(),
            "None".into(),
            "nan-ish".into(),
            "-3.2".into(),
        ]);
        assert_eq!(window.numeric_values(), vec![1500, -3]);
    }

    #[test]
    fn severity_rejects_out_of_range() {
        assert!(Severity::try_from(6u8).is_err());
    }
}
