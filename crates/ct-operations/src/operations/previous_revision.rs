use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use super::install::UpgradeContext;
use super::scope::random_suffix;
use crate::Result;
use crate::error::OperationError;
use crate::traits::GitProvider;

const WORKTREE_PREFIX: &str = "ct_previous_revision";

/// A temporary worktree holding the merge-base revision.
///
/// Checked out once per run and removed when dropped, so it outlives every
/// chart's upgrade test and is released on early aborts too.
pub struct PreviousRevision {
    git: Arc<dyn GitProvider>,
    repo_root: PathBuf,
    path: PathBuf,
    revision: String,
}

impl PreviousRevision {
    /// Checks out `revision` into a fresh directory under the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::PreviousRevision`] if the worktree cannot be
    /// created.
    pub fn checkout(git: Arc<dyn GitProvider>, repo_root: &Path, revision: &str) -> Result<Self> {
        let path = std::env::temp_dir().join(worktree_dir_name());
        info!(revision, path = %path.display(), "checking out previous revision");

        git.add_worktree(repo_root, &path, revision)
            .map_err(|source| OperationError::PreviousRevision {
                revision: revision.to_string(),
                path: path.clone(),
                source: Box::new(source),
            })?;

        Ok(Self {
            git,
            repo_root: repo_root.to_path_buf(),
            path,
            revision: revision.to_string(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }

    #[must_use]
    pub fn upgrade_context(&self) -> UpgradeContext<'_> {
        UpgradeContext {
            previous_root: &self.path,
        }
    }
}

impl Drop for PreviousRevision {
    fn drop(&mut self) {
        if let Err(e) = self.git.remove_worktree(&self.repo_root, &self.path) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove previous revision worktree"
            );
        }
    }
}

fn worktree_dir_name() -> String {
    let name = petname::petname(2, "-").unwrap_or_else(random_suffix);
    format!("{WORKTREE_PREFIX}_{name}")
}
