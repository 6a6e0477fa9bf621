use super::process::ProcessExecutor;
use crate::Result;
use crate::traits::CommandRunner;

/// [`CommandRunner`] that hands commands to `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellCommandRunner {
    executor: ProcessExecutor,
}

impl ShellCommandRunner {
    #[must_use]
    pub fn new(executor: ProcessExecutor) -> Self {
        Self { executor }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str) -> Result<()> {
        self.executor.run("sh", ["-c", command])
    }
}
