use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Derive the stable series identifier for a Graphite target expression.
///
/// The identifier is used as the `alias()` name in the bulk render query
/// and as the key the parsed response is stored under, so it must be
/// deterministic across processes and must not contain characters the
/// raw-data line grammar treats as delimiters.
pub fn series_id(query: &str) -> String {
    let digest = Sha256::digest(query.as_bytes());
    let mut id = String::with_capacity(13);
    id.push('m');
    for b in &digest[..6] {
        let _ = write!(id, "{b:02x}");
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_id_is_stable() {
        let a = series_id("sumSeries(api.*.latency)");
        let b = series_id("sumSeries(api.*.latency)");
        assert_eq!(a, b);
    }

    #[test]
    fn series_id_distinguishes_queries() {
        assert_ne!(series_id("api.latency"), series_id("api.errors"));
    }

    #[test]
    fn series_id_has_no_delimiters() {
        let id = series_id("aliasByNode(devices.servers.*.cpu, 2)");
        assert_eq!(id.len(), 13);
        assert!(!id.contains(',') && !id.contains('|') && !id.contains('\n'));
    }
}
