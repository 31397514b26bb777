use crate::harness::{Assertion, Scenario};
use journal_core::Payload;
use serde_json::json;

#[test]
fn test_context_brackets_statements() {
    Scenario::new("context_brackets_statements")
        .begin_context("The Test Context", Payload::new().with("foo", "bar"))
        .info("Test Log Message")
        .end_context()
        .assert_shape(&["BEGIN:The Test Context", "INFO:Test Log Message", "END"])
        .assert_field(0, "foo", json!("bar"))
        .assert_field(0, "control", json!("BEGIN"))
        .assert(Assertion::FieldAbsent {
            index: 2,
            key: "_title".into(),
        })
        .assert(Assertion::TimestampsFrom { start: 1000 })
        .assert(Assertion::AllOnCallingThread)
        .assert_well_formed()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_nested_contexts() {
    Scenario::new("nested_contexts")
        .begin_context("build", Payload::new())
        .info("compiling")
        .begin_context("link", Payload::new().with("target", "x86_64"))
        .info("linking")
        .end_context()
        .info("done")
        .end_context()
        .assert_shape(&[
            "BEGIN:build",
            "INFO:compiling",
            "BEGIN:link",
            "INFO:linking",
            "END",
            "INFO:done",
            "END",
        ])
        .assert(Assertion::TimestampsStrictlyIncreasing)
        .assert_well_formed()
        .run()
        .unwrap();
}

#[test]
fn test_panic_inside_context_still_writes_end() {
    Scenario::new("panic_inside_context")
        .begin_context("outer", Payload::new())
        .panic_in_context("explodes")
        .info("recovered")
        .end_context()
        .assert_shape(&[
            "BEGIN:outer",
            "BEGIN:explodes",
            "END",
            "INFO:recovered",
            "END",
        ])
        .assert_well_formed()
        .run()
        .unwrap();
}

#[test]
fn test_open_context_is_reported_until_closed() {
    Scenario::new("open_context")
        .begin_context("long running", Payload::new())
        .info("still going")
        .assert(Assertion::UnclosedContexts(1))
        .end_context()
        .assert(Assertion::UnclosedContexts(0))
        .assert_well_formed()
        .run()
        .unwrap();
}

#[test]
fn test_contexts_without_global_journal_write_nothing() {
    Scenario::new("contexts_without_global")
        .uninstall_global()
        .begin_context("quiet", Payload::new())
        .info("not recorded")
        .end_context()
        .install_global()
        .info("recorded")
        .assert_shape(&["INFO:recorded"])
        .run()
        .unwrap();
}
