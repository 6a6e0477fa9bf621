use std::path::Path;

use crate::Result;

/// The Helm operations the pipelines need.
///
/// Chart and values paths are either absolute or relative to the repository
/// root the implementation runs in.
pub trait PackageManager: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the version cannot be queried.
    fn version(&self) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be added.
    fn add_repository(&self, name: &str, url: &str, extra_args: &[String]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if dependencies cannot be resolved.
    fn build_dependencies(&self, chart: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if linting reports problems.
    fn lint(&self, chart: &Path, values: Option<&Path>) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be installed.
    fn install(
        &self,
        chart: &Path,
        values: Option<&Path>,
        namespace: &str,
        release: &str,
    ) -> Result<()>;

    /// Upgrades `release` in place, reusing its values.
    ///
    /// # Errors
    ///
    /// Returns an error if the upgrade fails.
    fn upgrade(&self, chart: &Path, namespace: &str, release: &str) -> Result<()>;

    /// Runs the release's test hooks.
    ///
    /// # Errors
    ///
    /// Returns an error if a test fails.
    fn test(&self, namespace: &str, release: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the release cannot be removed.
    fn uninstall(&self, namespace: &str, release: &str) -> Result<()>;
}
