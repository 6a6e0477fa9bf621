use std::path::Path;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Checks out `revision` into a new linked worktree at `path`.
    ///
    /// The worktree and a local branch are both named after the last
    /// component of `path`. `path` must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the revision cannot be resolved, or
    /// a git error if the worktree cannot be created.
    pub fn add_worktree(&self, path: &Path, revision: &str) -> Result<()> {
        let name = worktree_name(path)?;
        let commit = self.resolve_commit(revision)?;

        let reference = self.inner.branch(name, &commit, true)?.into_reference();

        let mut opts = git2::WorktreeAddOptions::new();
        opts.reference(Some(&reference));
        self.inner.worktree(name, path, Some(&opts))?;

        Ok(())
    }

    /// Removes the worktree previously created at `path`, including its
    /// working directory and helper branch.
    ///
    /// # Errors
    ///
    /// Returns a git error if the worktree is unknown or cannot be pruned.
    pub fn remove_worktree(&self, path: &Path) -> Result<()> {
        let name = worktree_name(path)?;
        let worktree = self.inner.find_worktree(name)?;

        let mut opts = git2::WorktreePruneOptions::new();
        opts.valid(true).locked(true).working_tree(true);
        worktree.prune(Some(&mut opts))?;

        if let Ok(mut branch) = self.inner.find_branch(name, git2::BranchType::Local) {
            branch.delete()?;
        }

        Ok(())
    }
}

fn worktree_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GitError::InvalidWorktreePath {
            path: path.to_path_buf(),
        })
}
