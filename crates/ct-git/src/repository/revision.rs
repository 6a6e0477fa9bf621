use std::path::Path;

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Whether `path` (root-relative) exists at `revision`.
    ///
    /// A revision that cannot be resolved is treated like a revision without
    /// the file.
    ///
    /// # Errors
    ///
    /// Currently infallible once the repository is open; kept fallible for
    /// symmetry with [`Repository::show_file`].
    pub fn file_exists_at(&self, revision: &str, path: &Path) -> Result<bool> {
        let Ok(tree) = self.resolve_tree(revision) else {
            return Ok(false);
        };

        Ok(tree.get_path(path).is_ok())
    }

    /// Reads the content of `path` (root-relative) as stored at `revision`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the revision cannot be resolved,
    /// [`GitError::FileNotFound`] if the path is absent at that revision and
    /// [`GitError::NonUtf8Content`] if the blob is not text.
    pub fn show_file(&self, revision: &str, path: &Path) -> Result<String> {
        let tree = self.resolve_tree(revision)?;

        let entry = tree.get_path(path).map_err(|_| GitError::FileNotFound {
            path: path.to_path_buf(),
            revision: revision.to_string(),
        })?;

        let blob = entry.to_object(&self.inner)?.peel_to_blob()?;

        String::from_utf8(blob.content().to_vec()).map_err(|_| GitError::NonUtf8Content {
            path: path.to_path_buf(),
            revision: revision.to_string(),
        })
    }
}
