//! Zenoss notifier boundary.
//!
//! Raise, clear, missing-metric, and backend-failure notifications
//! leave the bridge through a [`Notifier`]; the built-in
//! implementation posts events to the Zenoss JSON API
//! ([`zenoss::ZenossNotifier`]).

pub mod error;
pub mod zenoss;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use zenbridge_common::types::Notification;

/// Delivery boundary for fully composed notifications.
///
/// Implementations take no part in alert decisions; by the time a
/// [`Notification`] reaches them, the raise/clear/missing decision is
/// final.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the external service rejects the event or
    /// the transport fails.
    async fn notify(&self, notification: &Notification) -> error::Result<()>;

    /// Returns the notifier name (e.g. `"zenoss"`), used for logging.
    fn name(&self) -> &str;
}
