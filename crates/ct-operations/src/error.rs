use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Git(#[from] ct_git::GitError),

    #[error(transparent)]
    Chart(#[from] ct_chart::ChartError),

    #[error(transparent)]
    Config(#[from] ct_chart::ConfigError),

    #[error("version comparison failed")]
    Version(#[from] ct_version::VersionError),

    #[error("'{path}' is not inside a git repository")]
    NotARepository { path: PathBuf },

    #[error("failed to run '{program}'")]
    ProcessSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with {}{}", exit_code_display(*code), stderr_display(stderr))]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("helm {version} is not supported; helm 3 or newer is required")]
    UnsupportedHelmVersion { version: String },

    #[error("chart version not incremented for '{chart}': {old_version} -> {new_version}")]
    VersionNotIncremented {
        chart: String,
        old_version: String,
        new_version: String,
    },

    #[error("deprecated chart '{chart}' must not declare maintainers")]
    DeprecatedChartHasMaintainers { chart: String },

    #[error("chart '{chart}' must declare at least one maintainer")]
    NoMaintainers { chart: String },

    #[error("'{account}' is not a valid account on {domain}")]
    UnknownAccount { domain: String, account: String },

    #[error("maintainer validation is not supported for repositories hosted on '{domain}'")]
    UnsupportedRepositoryDomain { domain: String },

    #[error("remote '{remote}' has no URL")]
    RemoteNotFound { remote: String },

    #[error("cannot determine hosting domain of remote URL '{url}'")]
    InvalidRemoteUrl { url: String },

    #[error("request to '{url}' failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to create HTTP client")]
    HttpClient(#[source] reqwest::Error),

    #[error("{check} failed for chart '{chart}'")]
    CheckFailed {
        check: String,
        chart: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error("{stage} failed for chart '{chart}'")]
    InstallFailed {
        stage: &'static str,
        chart: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error("failed to build dependencies for chart '{chart}'")]
    DependencyBuild {
        chart: PathBuf,
        #[source]
        source: Box<OperationError>,
    },

    #[error("failed to add chart repository '{name}'")]
    AddRepository {
        name: String,
        #[source]
        source: Box<OperationError>,
    },

    #[error("failed to check out previous revision {revision} at '{path}'")]
    PreviousRevision {
        revision: String,
        path: PathBuf,
        #[source]
        source: Box<OperationError>,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;

fn exit_code_display(code: Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

fn stderr_display(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
