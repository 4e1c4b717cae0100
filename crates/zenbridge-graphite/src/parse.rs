use crate::error::{GraphiteError, Result};
use zenbridge_common::types::{SampleWindow, SeriesStore};

/// Parses a bulk raw-data response into a [`SeriesStore`].
///
/// Line grammar: `identifier,start,end,step|v1,v2,...,vN`. Blank lines
/// are skipped; malformed lines are logged and skipped so one bad
/// series never aborts the run. Each series keeps only its trailing
/// `monitor_window_secs / step` samples.
///
/// # Errors
///
/// [`GraphiteError::Unparseable`] when no line parses at all — that is
/// a backend-communication failure, not a parse failure.
pub fn parse_response(raw: &str, monitor_window_secs: u64) -> Result<SeriesStore> {
    let mut store = SeriesStore::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line, monitor_window_secs) {
            Some((id, window)) => {
                if store.insert(id.clone(), window).is_some() {
                    tracing::warn!(series = %id, "duplicate series identifier, last occurrence wins");
                }
            }
            None => tracing::warn!(line, "skipping unparseable series line"),
        }
    }

    if store.is_empty() {
        return Err(GraphiteError::Unparseable);
    }
    Ok(store)
}

/// One response line into `(identifier, retained window)`.
///
/// Header fields are taken from the right so an identifier may itself
/// contain commas; the aliases the bridge generates never do, but raw
/// target names can.
fn parse_line(line: &str, monitor_window_secs: u64) -> Option<(String, SampleWindow)> {
    let (header, samples) = line.split_once('|')?;

    let mut fields = header.rsplitn(4, ',');
    let step: i64 = fields.next()?.trim().parse().ok()?;
    let _end: i64 = fields.next()?.trim().parse().ok()?;
    let _start: i64 = fields.next()?.trim().parse().ok()?;
    let id = fields.next()?.trim();
    if id.is_empty() || step <= 0 {
        return None;
    }

    let mut tokens: Vec<String> = samples.split(',').map(|t| t.trim().to_string()).collect();
    let keep = (monitor_window_secs / step as u64) as usize;
    if tokens.len() > keep {
        tokens.drain(..tokens.len() - keep);
    }

    Some((id.to_string(), SampleWindow::new(tokens)))
}
