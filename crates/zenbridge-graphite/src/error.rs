/// Errors from the Graphite client boundary.
///
/// Every bulk query that ends in one of these counts as a single
/// backend-communication failure toward the consecutive-failure
/// maximum; individual malformed response lines do not (the parser
/// logs and skips those).
#[derive(Debug, thiserror::Error)]
pub enum GraphiteError {
    /// The configured base URL does not combine into a valid render URL.
    #[error("Graphite: invalid render URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure talking to Graphite.
    #[error("Graphite: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Graphite answered with a non-success status.
    #[error("Graphite: unexpected HTTP status {0}")]
    Status(u16),

    /// The response body contained no parseable series at all.
    #[error("Graphite: response contained no parseable series")]
    Unparseable,
}

/// Convenience `Result` alias for Graphite operations.
pub type Result<T> = std::result::Result<T, GraphiteError>;
