use crate::Result;

pub trait CommandRunner: Send + Sync {
    /// Runs `command` through the shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be started or exits non-zero.
    fn run(&self, command: &str) -> Result<()>;
}
