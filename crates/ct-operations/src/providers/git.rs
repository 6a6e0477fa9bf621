use std::path::{Path, PathBuf};

use ct_git::{GitError, Repository};

use crate::Result;
use crate::error::OperationError;
use crate::traits::GitProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn validate_repository(&self, repo_root: &Path) -> Result<()> {
        match Repository::open(repo_root) {
            Ok(_) => Ok(()),
            Err(GitError::NotARepository { path }) => Err(OperationError::NotARepository { path }),
            Err(e) => Err(e.into()),
        }
    }

    fn merge_base(&self, repo_root: &Path, left: &str, right: &str) -> Result<String> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.merge_base(left, right)?)
    }

    fn changed_files_since(
        &self,
        repo_root: &Path,
        revision: &str,
        dirs: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.changed_files_since(revision, dirs)?)
    }

    fn file_exists_at_revision(
        &self,
        repo_root: &Path,
        revision: &str,
        path: &Path,
    ) -> Result<bool> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.file_exists_at(revision, path)?)
    }

    fn read_file_at_revision(
        &self,
        repo_root: &Path,
        revision: &str,
        path: &Path,
    ) -> Result<String> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.show_file(revision, path)?)
    }

    fn remote_url(&self, repo_root: &Path, remote: &str) -> Result<Option<String>> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.remote_url(remote)?)
    }

    fn add_worktree(&self, repo_root: &Path, path: &Path, revision: &str) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.add_worktree(path, revision)?)
    }

    fn remove_worktree(&self, repo_root: &Path, path: &Path) -> Result<()> {
        let repo = Repository::open(repo_root)?;
        Ok(repo.remove_worktree(path)?)
    }
}
