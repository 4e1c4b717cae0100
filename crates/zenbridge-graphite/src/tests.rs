use crate::client::{FailureTracker, GraphiteClient};
use crate::error::GraphiteError;
use crate::parse::parse_response;
use zenbridge_common::types::{MetricCheck, Severity};

fn make_check(title: &str, query: &str) -> MetricCheck {
    MetricCheck {
        title: title.to_string(),
        query: query.to_string(),
        severity: Severity::Error,
        max: Some(2000),
        min: None,
        roc: None,
    }
}

#[test]
fn parses_multi_series_response() {
    let raw = "web.latency,1300000000,1300000600,60|100,200,None,300\n\
               web.errors,1300000000,1300000600,60|1,2,3\n";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 2);
    let window = store.get("web.latency").unwrap();
    assert_eq!(window.samples(), ["100", "200", "None", "300"]);
    assert_eq!(window.none_count(), 1);
}

#[test]
fn retains_only_the_monitoring_window() {
    // 60s buckets with a 300s window keeps the trailing 5 samples.
    let raw = "web.latency,0,600,60|1,2,3,4,5,6,7,8,9,10";
    let store = parse_response(raw, 300).unwrap();
    let window = store.get("web.latency").unwrap();
    assert_eq!(window.samples(), ["6", "7", "8", "9", "10"]);
}

#[test]
fn short_series_is_kept_whole() {
    let raw = "web.latency,0,600,60|1,2,3";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.get("web.latency").unwrap().len(), 3);
}

#[test]
fn malformed_line_does_not_abort_the_run() {
    let raw = "web.latency,0,600,60|100,200\n\
               this line is garbage\n\
               web.errors,0,600,60|1,2\n";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get("web.latency").is_some());
    assert!(store.get("web.errors").is_some());
}

#[test]
fn blank_lines_are_skipped() {
    let raw = "\n\nweb.latency,0,600,60|100\n\n";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn duplicate_identifier_last_occurrence_wins() {
    let raw = "web.latency,0,600,60|1,2\n\
               web.latency,0,600,60|3,4\n";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("web.latency").unwrap().samples(), ["3", "4"]);
}

#[test]
fn identifier_may_contain_commas() {
    // Raw (unaliased) targets can be function calls with arguments.
    let raw = "aliasByNode(devices.servers.*.cpu, 2),0,600,60|5,6";
    let store = parse_response(raw, 600).unwrap();
    assert!(store.get("aliasByNode(devices.servers.*.cpu, 2)").is_some());
}

#[test]
fn single_line_response_parses() {
    let raw = "web.latency,0,600,60|100,200";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn unparseable_body_is_a_communication_failure() {
    assert!(matches!(
        parse_response("<html>proxy error</html>", 600),
        Err(GraphiteError::Unparseable)
    ));
    assert!(matches!(
        parse_response("", 600),
        Err(GraphiteError::Unparseable)
    ));
}

#[test]
fn zero_step_line_is_rejected() {
    let raw = "web.latency,0,600,0|1,2\nweb.errors,0,600,60|1\n";
    let store = parse_response(raw, 600).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.get("web.latency").is_none());
}

#[test]
fn render_url_aliases_every_check() {
    let client = GraphiteClient::new("http://graphite.example:81/", None, None, 1200, 600);
    let checks = vec![
        make_check("API Latency", "sumSeries(api.*.latency)"),
        make_check("Reads", "devices.servers.db1.reads"),
    ];
    let url = client.render_url(&checks).unwrap();
    let url = url.as_str();

    assert!(url.starts_with("http://graphite.example:81/render/?"));
    assert!(url.contains("from=-1200s"));
    assert!(url.contains("rawData=true"));
    assert_eq!(url.matches("target=alias%28").count(), 2);
    for check in &checks {
        assert!(url.contains(&check.series_id()));
    }
}

#[test]
fn failure_tracker_escalates_past_the_maximum() {
    let mut tracker = FailureTracker::new(2);
    assert!(!tracker.record_failure());
    assert!(!tracker.record_failure());
    // The third consecutive failure crosses the maximum.
    assert!(tracker.record_failure());
    assert_eq!(tracker.consecutive(), 3);
}

#[test]
fn failure_tracker_resets_on_success() {
    let mut tracker = FailureTracker::new(2);
    tracker.record_failure();
    tracker.record_failure();
    tracker.record_success();
    assert_eq!(tracker.consecutive(), 0);
    assert!(!tracker.record_failure());
}
