use async_trait::async_trait;
use std::ffi::OsString;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

#[derive(Clone)]
pub struct MockProcessRunner {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

#[derive(Clone)]
enum MockResponse {
    Output(ProcessOutput),
    NotFound,
    Interrupted,
}

struct MockExpectation {
    program: String,
    #[allow(clippy::type_complexity)]
    args_matcher: Option<Box<dyn Fn(&[OsString]) -> bool + Send + Sync>>,
    response: MockResponse,
}

pub struct MockCommandConfig {
    runner: MockProcessRunner,
    expectation: MockExpectation,
    output: ProcessOutput,
    failure: Option<MockResponse>,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_command(&self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                args_matcher: None,
                response: MockResponse::NotFound,
            },
            output: ProcessOutput {
                status: ExitStatus::Success,
                duration: Duration::from_millis(10),
            },
            failure: None,
        }
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        self.calls_to(program).len() == times
    }

    pub fn calls_to(&self, program: &str) -> Vec<ProcessCommand> {
        self.get_call_history()
            .into_iter()
            .filter(|cmd| cmd.program == *program)
            .collect()
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.call_history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.call_history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(command.clone());

        let expectations = self
            .expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let matched = expectations.iter().find(|expectation| {
            command.program == *expectation.program
                && expectation
                    .args_matcher
                    .as_ref()
                    .map_or(true, |matcher| matcher(&command.args))
        });

        match matched.map(|expectation| expectation.response.clone()) {
            Some(MockResponse::Output(output)) => Ok(output),
            Some(MockResponse::NotFound) => {
                Err(ProcessError::CommandNotFound(command.program_name()))
            }
            Some(MockResponse::Interrupted) => Err(ProcessError::Interrupted),
            None => Err(ProcessError::MockExpectationNotMet(format!(
                "No expectation found for command: {}",
                command.display_line()
            ))),
        }
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[OsString]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.output.status = if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Error(code)
        };
        self
    }

    pub fn returns_signal(mut self, signal: i32) -> Self {
        self.output.status = ExitStatus::Signal(signal);
        self
    }

    pub fn returns_success(self) -> Self {
        self.returns_exit_code(0)
    }

    /// Simulate a program that is missing from `PATH`
    pub fn returns_not_found(mut self) -> Self {
        self.failure = Some(MockResponse::NotFound);
        self
    }

    /// Simulate a step cut short by Ctrl-C
    pub fn returns_interrupted(mut self) -> Self {
        self.failure = Some(MockResponse::Interrupted);
        self
    }

    pub fn finish(self) {
        let MockCommandConfig {
            runner,
            mut expectation,
            output,
            failure,
        } = self;

        expectation.response = failure.unwrap_or(MockResponse::Output(output));

        runner
            .expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(expectation);
    }
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}
