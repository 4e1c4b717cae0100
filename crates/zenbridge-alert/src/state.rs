use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;
use zenbridge_common::types::AlertKey;

/// Errors from alert-state persistence.
///
/// Only the write path can fail the run: losing the state file would
/// silently re-raise every active alert on the next run. Read failures
/// degrade to an empty previous state instead.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The state file could not be written.
    #[error("State: failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience `Result` alias for state-file operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// One generation of active alerts: each key maps to the timestamp the
/// alert first fired.
///
/// Entries are ordered so persisting the same set twice produces
/// byte-identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    entries: BTreeMap<AlertKey, String>,
}

impl AlertState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AlertKey, first_fired: String) {
        self.entries.insert(key, first_fired);
    }

    pub fn get(&self, key: &AlertKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &AlertKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AlertKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}

/// The persisted alert-state file: `<key>|<timestamp>` per line,
/// rewritten wholesale at the end of every completed run.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads the previous generation. A missing or unreadable file is
    /// an empty state, not an error; unrecognizable lines are logged
    /// and skipped, and anything after the second `|` field is ignored.
    pub fn load(&self) -> AlertState {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "no previous alert state");
                return AlertState::new();
            }
        };

        let mut state = AlertState::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split('|');
            let key_field = fields.next().unwrap_or_default();
            let stamp = fields.next().unwrap_or_default();
            match key_field.parse::<AlertKey>() {
                Ok(key) => state.insert(key, stamp.to_string()),
                Err(e) => tracing::warn!(line, error = %e, "skipping unrecognized state entry"),
            }
        }
        state
    }

    /// Replaces the file with exactly the given generation.
    pub fn save(&self, state: &AlertState) -> Result<()> {
        let mut buf = String::new();
        for (key, stamp) in state.iter() {
            let _ = writeln!(buf, "{key}|{stamp}");
        }
        std::fs::write(&self.path, buf).map_err(|source| StateError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}
