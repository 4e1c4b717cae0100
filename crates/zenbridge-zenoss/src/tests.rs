use crate::zenoss::ZenossNotifier;
use zenbridge_common::types::{Notification, Severity};

fn make_notifier() -> ZenossNotifier {
    ZenossNotifier::new(
        "http://zenoss.example:8080/",
        "admin",
        "secret",
        "graphite",
        "/Status",
    )
}

fn make_notification(severity: Severity) -> Notification {
    Notification {
        component: "API Latency-max".to_string(),
        message: "API Latency is over its threshold of 2000 at 2200 [ api.latency ]".to_string(),
        severity,
        metric: Some("api.latency".to_string()),
        value: Some(2200),
    }
}

#[test]
fn endpoint_trims_trailing_slash() {
    let notifier = make_notifier();
    assert_eq!(
        notifier.endpoint(),
        "http://zenoss.example:8080/zport/dmd/evconsole_router"
    );
}

#[test]
fn payload_is_an_add_event_rpc() {
    let notifier = make_notifier();
    let payload = notifier.build_payload(&make_notification(Severity::Error), 1);

    assert_eq!(payload["action"], "EventsRouter");
    assert_eq!(payload["method"], "add_event");
    assert_eq!(payload["tid"], 1);

    let event = &payload["data"][0];
    assert_eq!(event["device"], "graphite");
    assert_eq!(event["component"], "API Latency-max");
    assert_eq!(event["evclasskey"], "API Latency-max");
    assert_eq!(event["evclass"], "/Status");
    assert_eq!(event["severity"], 4);
    assert!(event["summary"]
        .as_str()
        .unwrap()
        .contains("over its threshold"));
}

#[test]
fn clear_events_carry_severity_zero() {
    let notifier = make_notifier();
    let payload = notifier.build_payload(&make_notification(Severity::Clear), 2);
    assert_eq!(payload["data"][0]["severity"], 0);
    assert_eq!(payload["tid"], 2);
}
