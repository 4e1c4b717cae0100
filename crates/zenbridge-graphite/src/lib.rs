//! Graphite backend-client boundary.
//!
//! Builds the one bulk render query covering every configured check,
//! executes it over HTTP, and parses the raw-data response into the
//! per-run [`SeriesStore`](zenbridge_common::types::SeriesStore).
//! Consecutive query failures are counted by [`client::FailureTracker`]
//! so the caller can escalate after a bounded number of them.

pub mod client;
pub mod error;
pub mod parse;

#[cfg(test)]
mod tests;
