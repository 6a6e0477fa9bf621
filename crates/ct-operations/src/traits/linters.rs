use std::path::Path;

use crate::Result;

pub trait SchemaValidator: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if `file` does not match `schema`.
    fn validate_schema(&self, file: &Path, schema: &Path) -> Result<()>;
}

pub trait StyleLinter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if `file` violates the rules in `config`.
    fn lint_style(&self, file: &Path, config: &Path) -> Result<()>;
}
