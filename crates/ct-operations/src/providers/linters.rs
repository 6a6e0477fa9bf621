use std::ffi::OsStr;
use std::path::Path;

use super::process::ProcessExecutor;
use crate::Result;
use crate::traits::{SchemaValidator, StyleLinter};

/// [`SchemaValidator`] backed by the `yamale` binary.
#[derive(Debug, Clone)]
pub struct Yamale {
    executor: ProcessExecutor,
}

impl Yamale {
    #[must_use]
    pub fn new(executor: ProcessExecutor) -> Self {
        Self { executor }
    }
}

impl SchemaValidator for Yamale {
    fn validate_schema(&self, file: &Path, schema: &Path) -> Result<()> {
        self.executor.run(
            "yamale",
            [
                OsStr::new("--schema"),
                schema.as_os_str(),
                file.as_os_str(),
            ],
        )
    }
}

/// [`StyleLinter`] backed by the `yamllint` binary.
#[derive(Debug, Clone)]
pub struct Yamllint {
    executor: ProcessExecutor,
}

impl Yamllint {
    #[must_use]
    pub fn new(executor: ProcessExecutor) -> Self {
        Self { executor }
    }
}

impl StyleLinter for Yamllint {
    fn lint_style(&self, file: &Path, config: &Path) -> Result<()> {
        self.executor.run(
            "yamllint",
            [
                OsStr::new("--config-file"),
                config.as_os_str(),
                file.as_os_str(),
            ],
        )
    }
}
