use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use journal_core::Fields;
use serde_json::Value;
use std::collections::HashMap;

#[test]
fn test_concurrent_workers_produce_well_formed_journal() {
    Scenario::new("concurrent_workers")
        .concurrent_workers(4, 25)
        .assert_entry_count(4 * 27)
        .assert(Assertion::ThreadCount(4))
        .assert(Assertion::TimestampsStrictlyIncreasing)
        .assert_well_formed()
        .assert(Assertion::Custom(Box::new(|entries: &[Fields]| {
            // Each thread's messages stay in order and inside its own context
            let mut next: HashMap<&str, usize> = HashMap::new();
            for entry in entries {
                let thread = entry["_thread"].as_str().unwrap_or_default();
                let Some(value) = entry.get("_value").and_then(Value::as_str) else {
                    continue;
                };
                let expected = next.entry(thread).or_default();
                ensure!(
                    value.ends_with(&format!("message {}", expected)),
                    "out of order on {}: {}",
                    thread,
                    value
                );
                *expected += 1;
            }
            ensure!(next.values().all(|n| *n == 25), "missing messages: {:?}", next);
            Ok(())
        })))
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_workers_interleave_with_main_thread_context() {
    Scenario::new("workers_inside_context")
        .begin_context("fan out", journal_core::Payload::new())
        .concurrent_workers(3, 5)
        .info("joined")
        .end_context()
        .assert_entry_count(2 + 3 * 7 + 1)
        .assert(Assertion::ThreadCount(4))
        .assert_well_formed()
        .run()
        .unwrap();
}
