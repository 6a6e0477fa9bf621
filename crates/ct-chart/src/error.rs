use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("'{path}' is not a chart directory: no Chart.yaml found")]
    NotAChart { path: PathBuf },

    #[error("failed to read chart descriptor at '{path}'")]
    DescriptorRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse chart descriptor at '{path}'")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to list directory '{path}'")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read ignore file at '{path}'")]
    IgnoreFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid ignore pattern '{pattern}' in '{path}'")]
    GlobPattern {
        path: PathBuf,
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML config file '{path}'")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to parse TOML config file '{path}'")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse JSON config file '{path}'")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config file format '{path}' (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("specifying both '--all' and '--charts' is not allowed")]
    AllWithCharts,

    #[error("'--release-label' must be set when '--namespace' is set")]
    NamespaceWithoutReleaseLabel,

    #[error("'{file}' not found; required when {check} is enabled")]
    MissingLintFile { file: String, check: &'static str },

    #[error("invalid chart repository '{entry}', expected 'name=url'")]
    InvalidChartRepo { entry: String },

    #[error("invalid repository extra args '{entry}', expected 'name=args'")]
    InvalidRepoExtraArgs { entry: String },

    #[error("at least one chart directory must be configured")]
    NoChartDirs,
}
