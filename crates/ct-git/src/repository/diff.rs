use std::path::{Path, PathBuf};

use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// Lists files that differ between `revision` and the working tree,
    /// restricted to the given root-relative directories.
    ///
    /// Staged and unstaged modifications of tracked files are included. A
    /// renamed file is reported under its new path. An empty `dirs` slice, or
    /// a `.` entry, means the whole tree.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if `revision` cannot be resolved.
    pub fn changed_files_since(&self, revision: &str, dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let base_tree = self.resolve_tree(revision)?;

        let mut opts = git2::DiffOptions::new();
        for dir in dirs.iter().filter(|d| !is_whole_tree(d)) {
            opts.pathspec(dir.as_path());
        }

        let mut diff = self
            .inner
            .diff_tree_to_workdir_with_index(Some(&base_tree), Some(&mut opts))?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changed = Vec::new();
        for delta in diff.deltas() {
            if !matches!(
                delta.status(),
                git2::Delta::Added
                    | git2::Delta::Deleted
                    | git2::Delta::Modified
                    | git2::Delta::Renamed
                    | git2::Delta::Copied
            ) {
                continue;
            }

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(PathBuf::from)
                .ok_or(GitError::MissingDeltaPath)?;
            changed.push(path);
        }

        Ok(changed)
    }
}

fn is_whole_tree(dir: &Path) -> bool {
    dir.as_os_str().is_empty() || dir == Path::new(".")
}
