use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tracing::debug;

use crate::Result;
use crate::error::OperationError;

/// Runs external tools from a fixed working directory.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    workdir: PathBuf,
}

impl ProcessExecutor {
    #[must_use]
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Runs `program` and discards its output.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::ProcessSpawn`] if the program cannot be started
    /// and [`OperationError::ProcessFailed`] if it exits non-zero.
    pub fn run<I, S>(&self, program: &str, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.output(program, args).map(drop)
    }

    /// Runs `program` and returns its trimmed standard output.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::ProcessSpawn`] if the program cannot be started
    /// and [`OperationError::ProcessFailed`] if it exits non-zero.
    pub fn output<I, S>(&self, program: &str, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(&self.workdir);
        let shown = command_line(&cmd);

        debug!(command = %shown, workdir = %self.workdir.display(), "running command");
        let output = cmd.output().map_err(|source| OperationError::ProcessSpawn {
            program: program.to_string(),
            source,
        })?;

        check_status(shown, output)
    }
}

fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_status(command: String, output: Output) -> Result<String> {
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if output.status.success() {
        if !stdout.is_empty() {
            debug!(command = %command, "{stdout}");
        }
        return Ok(stdout);
    }

    let mut stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        stderr = stdout;
    }
    Err(OperationError::ProcessFailed {
        command,
        code: output.status.code(),
        stderr,
    })
}

/// Splits a configured argument string on whitespace.
pub(crate) fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}
