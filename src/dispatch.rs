use std::cell::RefCell;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::model::Invocation;

/// Launches a resolved invocation and reports the exit code to propagate.
pub trait Dispatcher {
    fn execute(&self, invocation: &Invocation) -> Result<i32>;
}

/// Spawns the child with the terminal inherited and waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDispatcher;

impl Dispatcher for ProcessDispatcher {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        debug!("spawning {}", invocation.display_line());
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("failed to launch {}", invocation.program.display()))?;

        match status.code() {
            Some(code) => Ok(code),
            None => {
                warn!("{} terminated without an exit code", invocation.program.display());
                Ok(0)
            }
        }
    }
}

/// Test double: records invocations instead of running them and answers
/// with a fixed code. Not meant for production use.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    exit_code: i32,
    calls: RefCell<Vec<Invocation>>,
}

impl RecordingDispatcher {
    pub fn with_exit_code(exit_code: i32) -> Self {
        Self {
            exit_code,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn execute(&self, invocation: &Invocation) -> Result<i32> {
        self.calls.borrow_mut().push(invocation.clone());
        Ok(self.exit_code)
    }
}
