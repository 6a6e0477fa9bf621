use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("failed to resolve reference '{refspec}'")]
    RefNotFound { refspec: String },

    #[error("no common ancestor between '{left}' and '{right}'")]
    NoMergeBase { left: String, right: String },

    #[error("file '{path}' does not exist at revision '{revision}'")]
    FileNotFound { path: PathBuf, revision: String },

    #[error("file '{path}' at revision '{revision}' is not valid UTF-8")]
    NonUtf8Content { path: PathBuf, revision: String },

    #[error("worktree path '{path}' has no usable directory name")]
    InvalidWorktreePath { path: PathBuf },

    #[error("diff delta has no file path")]
    MissingDeltaPath,
}
