use std::path::{Path, PathBuf};

use ct_chart::{TestConfig, classify_changed_files, list_chart_dirs};
use tracing::{debug, info, warn};

use crate::Result;
use crate::traits::GitProvider;

/// The revision changes are compared against: `<remote>/<target_branch>`.
#[must_use]
pub fn target_revision(config: &TestConfig) -> String {
    format!("{}/{}", config.remote, config.target_branch)
}

/// Decides which chart directories a run processes.
pub struct ChartSelector<'a> {
    git: &'a dyn GitProvider,
    repo_root: &'a Path,
    config: &'a TestConfig,
}

impl<'a> ChartSelector<'a> {
    #[must_use]
    pub fn new(git: &'a dyn GitProvider, repo_root: &'a Path, config: &'a TestConfig) -> Self {
        Self {
            git,
            repo_root,
            config,
        }
    }

    /// Selects charts by the first matching rule: every chart with `all`,
    /// the explicit `charts` list as given, or the charts changed since the
    /// merge base.
    ///
    /// # Errors
    ///
    /// Returns an error if a chart root cannot be listed or the changed charts
    /// cannot be computed.
    pub fn select(&self) -> Result<Vec<PathBuf>> {
        if self.config.all {
            let dirs = list_chart_dirs(
                self.repo_root,
                &self.config.chart_dirs,
                &self.config.excluded_charts,
            )?;
            info!(count = dirs.len(), "selected all charts");
            return Ok(dirs);
        }

        if !self.config.charts.is_empty() {
            debug!(count = self.config.charts.len(), "using explicitly listed charts");
            return Ok(self.config.charts.clone());
        }

        self.changed()
    }

    /// Chart directories with changes between the merge base and the working
    /// tree.
    ///
    /// Changed files outside any chart are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::OperationError::NotARepository`] outside a git working
    /// tree, or an error if the merge base or diff cannot be computed.
    pub fn changed(&self) -> Result<Vec<PathBuf>> {
        self.git.validate_repository(self.repo_root)?;

        let merge_base = self.merge_base()?;
        info!(merge_base = %merge_base, "computing changed charts");

        let files =
            self.git
                .changed_files_since(self.repo_root, &merge_base, &self.config.chart_dirs)?;

        let classified = classify_changed_files(
            self.repo_root,
            &files,
            &self.config.chart_dirs,
            &self.config.excluded_charts,
            self.config.use_helmignore,
        )?;

        for dir in &classified.unresolved_dirs {
            warn!(directory = %dir.display(), "not a valid chart directory, skipping");
        }
        for file in &classified.ignored_files {
            debug!(file = %file.display(), "ignored by .helmignore");
        }

        Ok(classified.chart_dirs)
    }

    /// # Errors
    ///
    /// Returns an error if either revision cannot be resolved.
    pub fn merge_base(&self) -> Result<String> {
        self.git.merge_base(
            self.repo_root,
            &target_revision(self.config),
            &self.config.since,
        )
    }
}
