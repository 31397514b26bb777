use crate::harness::{Assertion, Scenario};
use journal_core::Payload;
use tracing::Level;

#[test]
fn test_append_after_close_fails() {
    Scenario::new("append_after_close")
        .info("before close")
        .close_journal()
        .expect_log_fails("after close")
        .assert_shape(&["INFO:before close"])
        .assert(Assertion::NoEntryWithValue("after close".into()))
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_statements_that_are_not_journal_worthy_ignore_closed_journal() {
    Scenario::new("closed_journal_ignored_when_not_worthy")
        .close_journal()
        .plain_log(Level::ERROR, "no payload", None)
        .plain_log(Level::ERROR, "suppressed", Some(Payload::new().no_journal()))
        .assert_entry_count(0)
        .run()
        .unwrap();
}

#[test]
fn test_uninstalled_global_drops_statements() {
    Scenario::new("uninstalled_global")
        .info("first")
        .uninstall_global()
        .info("dropped")
        .install_global()
        .info("second")
        .assert_shape(&["INFO:first", "INFO:second"])
        .assert(Assertion::TimestampsFrom { start: 1000 })
        .run()
        .unwrap();
}

#[test]
fn test_journal_replays_as_valid_stream() {
    Scenario::new("replay")
        .clock_starting_at(0)
        .begin_context("multi\nline title", Payload::new())
        .info("text with \"quotes\" and a\nnewline")
        .end_context()
        .assert_shape(&[
            "BEGIN:multi\nline title",
            "INFO:text with \"quotes\" and a\nnewline",
            "END",
        ])
        .assert(Assertion::TimestampsFrom { start: 0 })
        .run()
        .unwrap();
}
