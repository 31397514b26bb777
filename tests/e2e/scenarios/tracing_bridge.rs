use crate::harness::{Assertion, Scenario};
use journal_core::Payload;
use serde_json::json;
use tracing::Level;

#[test]
fn test_tracing_events_with_payload_are_journaled() {
    Scenario::new("tracing_payload")
        .tracing_event(
            Level::INFO,
            "Hello, World!",
            Some(Payload::new().with("foo", "bar").format("FMT")),
        )
        .tracing_event(Level::WARN, "no payload", None)
        .tracing_event(
            Level::ERROR,
            "suppressed",
            Some(Payload::new().no_journal()),
        )
        .assert_shape(&["INFO:Hello, World!"])
        .assert_field(0, "foo", json!("bar"))
        .assert_field(0, "format", json!("FMT"))
        .assert(Assertion::AllOnCallingThread)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_tracing_events_inside_context() {
    Scenario::new("tracing_in_context")
        .begin_context("request", Payload::new().with("id", 7))
        .tracing_event(
            Level::DEBUG,
            "Hello, World!",
            Some(Payload::new().override_message("HELLO, JOURNAL")),
        )
        .end_context()
        .assert_shape(&["BEGIN:request", "DEBUG:HELLO, JOURNAL", "END"])
        .assert_field(1, "format", json!("pre"))
        .assert_well_formed()
        .run()
        .unwrap();
}
