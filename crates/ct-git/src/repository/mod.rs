mod diff;
mod revision;
mod worktree;

use std::path::{Path, PathBuf};

use crate::{GitError, Result};

pub struct Repository {
    pub(crate) inner: git2::Repository,
    root: PathBuf,
}

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if the path is not inside a git repository.
    pub fn open(path: &Path) -> Result<Self> {
        let inner = git2::Repository::discover(path).map_err(|_| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        let root = inner.workdir().ok_or_else(|| GitError::NotARepository {
            path: path.to_path_buf(),
        })?;

        // Use dunce to get a path without the \\?\ prefix on Windows
        let root = dunce::simplified(root).to_path_buf();

        Ok(Self { inner, root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn resolve_commit(&self, refspec: &str) -> Result<git2::Commit<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_commit().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }

    pub(crate) fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_tree().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }

    /// Returns the common ancestor of two revisions as a full hex object id.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either revision cannot be resolved and
    /// [`GitError::NoMergeBase`] if the histories are unrelated.
    pub fn merge_base(&self, left: &str, right: &str) -> Result<String> {
        let left_commit = self.resolve_commit(left)?;
        let right_commit = self.resolve_commit(right)?;

        let oid = self
            .inner
            .merge_base(left_commit.id(), right_commit.id())
            .map_err(|_| GitError::NoMergeBase {
                left: left.to_string(),
                right: right.to_string(),
            })?;

        Ok(oid.to_string())
    }

    /// Looks up the fetch URL of a configured remote. A missing remote yields `None`.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .inner
            .find_remote(name)
            .ok()
            .and_then(|remote| remote.url().map(str::to_owned)))
    }
}
