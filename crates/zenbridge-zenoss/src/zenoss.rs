use crate::error::{NotifyError, Result};
use crate::Notifier;
use async_trait::async_trait;
use serde_json::{json, Value};
use zenbridge_common::types::Notification;

/// Submits events through the Zenoss JSON API's `EventsRouter`.
///
/// Every notification becomes one `add_event` RPC against the
/// configured device and event class. Clears are ordinary events at
/// severity 0; Zenoss pairs them with the open event sharing the same
/// device, component, and event class key.
pub struct ZenossNotifier {
    endpoint: String,
    username: String,
    password: String,
    device: String,
    event_class: String,
    client: reqwest::Client,
}

impl ZenossNotifier {
    pub fn new(url: &str, username: &str, password: &str, device: &str, event_class: &str) -> Self {
        Self {
            endpoint: format!("{}/zport/dmd/evconsole_router", url.trim_end_matches('/')),
            username: username.to_string(),
            password: password.to_string(),
            device: device.to_string(),
            event_class: event_class.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// The router URL events are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn build_payload(&self, notification: &Notification, tid: u64) -> Value {
        json!({
            "action": "EventsRouter",
            "method": "add_event",
            "data": [{
                "summary": notification.message,
                "device": self.device,
                "component": notification.component,
                "severity": u8::from(notification.severity),
                "evclasskey": notification.component,
                "evclass": self.event_class,
            }],
            "type": "rpc",
            "tid": tid,
        })
    }
}

#[async_trait]
impl Notifier for ZenossNotifier {
    async fn notify(&self, notification: &Notification) -> Result<()> {
        let payload = self.build_payload(notification, 1);
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                component = %notification.component,
                "Zenoss rejected event submission"
            );
            return Err(NotifyError::Api {
                service: "zenoss",
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(
            component = %notification.component,
            severity = %notification.severity,
            "event submitted"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "zenoss"
    }
}
