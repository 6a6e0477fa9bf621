use std::path::{Path, PathBuf};

use crate::Result;

pub trait GitProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`crate::OperationError::NotARepository`] if `repo_root` is not
    /// inside a git working tree.
    fn validate_repository(&self, repo_root: &Path) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if either reference cannot be resolved or the two
    /// commits share no history.
    fn merge_base(&self, repo_root: &Path, left: &str, right: &str) -> Result<String>;

    /// Files changed between `revision` and the working tree, limited to `dirs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or diff fails.
    fn changed_files_since(
        &self,
        repo_root: &Path,
        revision: &str,
        dirs: &[PathBuf],
    ) -> Result<Vec<PathBuf>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn file_exists_at_revision(&self, repo_root: &Path, revision: &str, path: &Path)
    -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the file does not exist at `revision` or is not UTF-8.
    fn read_file_at_revision(&self, repo_root: &Path, revision: &str, path: &Path)
    -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, repo_root: &Path, remote: &str) -> Result<Option<String>>;

    /// Checks out `revision` into a new linked worktree at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` already exists or `revision` cannot be resolved.
    fn add_worktree(&self, repo_root: &Path, path: &Path, revision: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the worktree cannot be pruned.
    fn remove_worktree(&self, repo_root: &Path, path: &Path) -> Result<()>;
}
