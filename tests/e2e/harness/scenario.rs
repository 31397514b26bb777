use super::assertions::Assertion;
use super::runner::ScenarioRunner;
use super::steps::ScenarioStep;
use journal_core::Payload;
use serde_json::Value;
use tracing::Level;

/// Fluent DSL for building journal scenarios
pub struct Scenario {
    name: String,
    clock_start: u64,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create a new scenario with the given name
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            clock_start: 1000,
            steps: Vec::new(),
        }
    }

    /// First timestamp written will be `start + 1`
    pub fn clock_starting_at(mut self, start: u64) -> Self {
        self.clock_start = start;
        self
    }

    // ===== Logging =====

    /// Journal logger statement
    pub fn log(mut self, level: Level, message: &str, payload: Option<Payload>) -> Self {
        self.steps.push(ScenarioStep::Log {
            level,
            message: message.to_string(),
            payload,
        });
        self
    }

    /// Journal logger INFO statement with an empty payload
    pub fn info(self, message: &str) -> Self {
        self.log(Level::INFO, message, None)
    }

    /// Plain logger statement
    pub fn plain_log(mut self, level: Level, message: &str, payload: Option<Payload>) -> Self {
        self.steps.push(ScenarioStep::PlainLog {
            level,
            message: message.to_string(),
            payload,
        });
        self
    }

    /// `tracing` event
    pub fn tracing_event(mut self, level: Level, message: &str, payload: Option<Payload>) -> Self {
        self.steps.push(ScenarioStep::TracingEvent {
            level,
            message: message.to_string(),
            payload,
        });
        self
    }

    /// Message followed by indented JSON detail
    pub fn log_detail(mut self, message: &str, detail: Value) -> Self {
        self.steps.push(ScenarioStep::LogDetail {
            message: message.to_string(),
            detail,
        });
        self
    }

    // ===== Contexts =====

    /// Open a context
    pub fn begin_context(mut self, title: &str, extra: Payload) -> Self {
        self.steps.push(ScenarioStep::BeginContext {
            title: title.to_string(),
            extra,
        });
        self
    }

    /// Close the innermost open context
    pub fn end_context(mut self) -> Self {
        self.steps.push(ScenarioStep::EndContext);
        self
    }

    /// Run a panicking operation in a context
    pub fn panic_in_context(mut self, title: &str) -> Self {
        self.steps.push(ScenarioStep::PanicInContext {
            title: title.to_string(),
        });
        self
    }

    /// Spawn worker threads that log concurrently
    pub fn concurrent_workers(mut self, threads: usize, messages: usize) -> Self {
        self.steps
            .push(ScenarioStep::ConcurrentWorkers { threads, messages });
        self
    }

    // ===== Lifecycle =====

    /// Make the scenario journal the global journal again
    pub fn install_global(mut self) -> Self {
        self.steps.push(ScenarioStep::InstallGlobal);
        self
    }

    /// Clear the global journal
    pub fn uninstall_global(mut self) -> Self {
        self.steps.push(ScenarioStep::UninstallGlobal);
        self
    }

    /// Close the scenario journal
    pub fn close_journal(mut self) -> Self {
        self.steps.push(ScenarioStep::CloseJournal);
        self
    }

    /// Expect a statement to fail
    pub fn expect_log_fails(mut self, message: &str) -> Self {
        self.steps.push(ScenarioStep::ExpectLogFails {
            message: message.to_string(),
        });
        self
    }

    // ===== Assertions =====

    /// Add a general assertion
    pub fn assert(mut self, assertion: Assertion) -> Self {
        self.steps.push(ScenarioStep::Assert { assertion });
        self
    }

    /// Assert the number of entries
    pub fn assert_entry_count(self, count: usize) -> Self {
        self.assert(Assertion::EntryCount(count))
    }

    /// Assert the sequence of entries
    pub fn assert_shape(self, shape: &[&str]) -> Self {
        self.assert(Assertion::Shape(
            shape.iter().map(|s| s.to_string()).collect(),
        ))
    }

    /// Assert one field of one entry
    pub fn assert_field(self, index: usize, key: &str, value: Value) -> Self {
        self.assert(Assertion::FieldEquals {
            index,
            key: key.to_string(),
            value,
        })
    }

    /// Assert the journal replays with no structural issues
    pub fn assert_well_formed(self) -> Self {
        self.assert(Assertion::WellFormed)
    }

    // ===== Execution =====

    /// Execute the scenario and return results
    pub fn run(self) -> ScenarioResult {
        let mut runner = match ScenarioRunner::new(self.clock_start) {
            Ok(r) => r,
            Err(e) => {
                return ScenarioResult {
                    name: self.name.clone(),
                    success: false,
                    steps_executed: 0,
                    failure_step: Some(0),
                    error: Some(format!("Failed to create runner: {}", e)),
                }
            }
        };

        match runner.execute(&self.steps) {
            Ok(()) => ScenarioResult {
                name: self.name,
                success: true,
                steps_executed: self.steps.len(),
                failure_step: None,
                error: None,
            },
            Err(e) => {
                let failure_step = runner.current_step();
                ScenarioResult {
                    name: self.name,
                    success: false,
                    steps_executed: failure_step,
                    failure_step: Some(failure_step),
                    error: Some(format!("{:?}", e)),
                }
            }
        }
    }
}

/// Result of running a scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub steps_executed: usize,
    pub failure_step: Option<usize>,
    pub error: Option<String>,
}

impl ScenarioResult {
    /// Unwrap the result, panicking if it failed
    pub fn unwrap(self) {
        if !self.success {
            panic!(
                "Scenario '{}' failed at step {}: {}",
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }

    /// Expect the result to be successful
    pub fn expect(self, msg: &str) {
        if !self.success {
            panic!(
                "{}: Scenario '{}' failed at step {}: {}",
                msg,
                self.name,
                self.failure_step.unwrap_or(0),
                self.error.unwrap_or_else(|| "unknown error".to_string())
            );
        }
    }
}
