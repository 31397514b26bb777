use crate::harness::{Assertion, Scenario};
use journal_core::{Fields, Payload};
use serde_json::json;
use tracing::Level;

#[test]
fn test_basic_message() {
    Scenario::new("basic_message")
        .plain_log(
            Level::INFO,
            "Hello, World!",
            Some(Payload::new().with("foo", "bar").format("FMT")),
        )
        .assert_entry_count(1)
        .assert_field(0, "_type", json!("JournalMessage"))
        .assert_field(0, "_value", json!("Hello, World!"))
        .assert_field(0, "_level", json!("INFO"))
        .assert_field(0, "foo", json!("bar"))
        .assert_field(0, "format", json!("FMT"))
        .assert(Assertion::TimestampsFrom { start: 1000 })
        .assert(Assertion::AllOnCallingThread)
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_override_message() {
    Scenario::new("override_message")
        .plain_log(
            Level::DEBUG,
            "Hello, World!",
            Some(
                Payload::new()
                    .with("foo", "bar")
                    .override_message("HELLO, JOURNAL"),
            ),
        )
        .assert_shape(&["DEBUG:HELLO, JOURNAL"])
        .assert_field(0, "foo", json!("bar"))
        .assert_field(0, "format", json!("pre"))
        .assert(Assertion::FieldAbsent {
            index: 0,
            key: "_journal_message".into(),
        })
        .run()
        .unwrap();
}

#[test]
fn test_suppressed_message() {
    Scenario::new("suppressed_message")
        .plain_log(
            Level::ERROR,
            "Hello, World!",
            Some(Payload::new().no_journal()),
        )
        .log(
            Level::ERROR,
            "Hello, World!",
            Some(Payload::new().no_journal()),
        )
        .assert_entry_count(0)
        .run()
        .unwrap();
}

#[test]
fn test_no_payload_is_not_journaled() {
    let mut scenario = Scenario::new("no_payload");
    for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
        scenario = scenario.plain_log(level, "plain statement", None);
    }
    scenario
        .info("journal logger statement")
        .assert_shape(&["INFO:journal logger statement"])
        .run()
        .unwrap();
}

#[test]
fn test_pass_through_fields_keep_order_and_types() {
    Scenario::new("pass_through_fields")
        .plain_log(
            Level::WARN,
            "disk usage",
            Some(
                Payload::new()
                    .with("mount", "/var")
                    .with("percent", 91.5)
                    .with("paths", json!(["/var/log", "/var/tmp"]))
                    .with("critical", true),
            ),
        )
        .assert(Assertion::Custom(Box::new(|entries: &[Fields]| {
            let keys: Vec<&str> = entries[0].keys().map(String::as_str).collect();
            anyhow::ensure!(
                keys == [
                    "_type",
                    "_timestamp",
                    "_thread",
                    "_value",
                    "_level",
                    "mount",
                    "percent",
                    "paths",
                    "critical",
                    "format"
                ],
                "unexpected key order: {:?}",
                keys
            );
            Ok(())
        })))
        .assert_field(0, "paths", json!(["/var/log", "/var/tmp"]))
        .assert_field(0, "critical", json!(true))
        .run()
        .unwrap();
}

#[test]
fn test_detail_is_indented_json() {
    Scenario::new("detail")
        .log_detail("Response", json!({"status": "ok", "items": [1]}))
        .assert_field(
            0,
            "_value",
            json!("Response\n{\n  \"status\": \"ok\",\n  \"items\": [\n    1\n  ]\n}"),
        )
        .run()
        .unwrap();
}
