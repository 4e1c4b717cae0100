//! Shared types for the zenbridge workspace.
//!
//! Defines the configuration and evaluation vocabulary used across the
//! bridge: metric checks, sample windows, rule kinds, alert keys,
//! verdicts, and composed notifications, plus the stable series
//! identifier derivation in [`id`].

pub mod id;
pub mod types;
