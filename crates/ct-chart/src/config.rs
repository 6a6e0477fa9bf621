use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Config file names looked up in each search directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &["ct.yaml", "ct.yml", "ct.toml", "ct.json"];

pub const SCHEMA_FILE: &str = "chart_schema.yaml";
pub const LINT_CONF_FILE: &str = "lintconf.yaml";

const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_TARGET_BRANCH: &str = "master";
const DEFAULT_SINCE: &str = "HEAD";
const DEFAULT_CHART_DIR: &str = "charts";
const DEFAULT_RELEASE_LABEL: &str = "app.kubernetes.io/instance";

/// Directories searched for config files, schema and lint config.
///
/// The working directory comes first, then `$HOME/.ct`, then `/etc/ct`.
#[must_use]
pub fn config_search_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![PathBuf::from(".")];
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".ct"));
    }
    dirs.push(PathBuf::from("/etc/ct"));
    dirs
}

/// Returns the first existing `name` inside `search_dirs`.
#[must_use]
pub fn locate_file(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// A chart repository to register before testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRepo {
    pub name: String,
    pub url: String,
}

/// Lint inputs resolved for the enabled validation checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintFiles {
    pub chart_schema: Option<PathBuf>,
    pub lint_conf: Option<PathBuf>,
}

/// Settings shared by all commands.
///
/// Values come from a config file and are then overridden by command-line
/// flags. Extra argument strings are split on whitespace when passed to the
/// tools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct TestConfig {
    pub remote: String,
    pub target_branch: String,
    pub since: String,
    pub build_id: String,
    pub chart_dirs: Vec<PathBuf>,
    pub excluded_charts: Vec<String>,
    pub charts: Vec<PathBuf>,
    pub all: bool,
    pub chart_repos: Vec<String>,
    pub helm_repo_extra_args: Vec<String>,
    pub helm_extra_args: String,
    pub helm_lint_extra_args: String,
    pub helm_dependency_extra_args: String,
    pub additional_commands: Vec<String>,
    pub namespace: Option<String>,
    pub release_label: String,
    pub exclude_deprecated: bool,
    pub skip_missing_values: bool,
    pub upgrade: bool,
    pub print_logs: bool,
    pub skip_clean_up: bool,
    pub check_version_increment: bool,
    pub validate_chart_schema: bool,
    pub validate_yaml: bool,
    pub validate_maintainers: bool,
    pub chart_yaml_schema: Option<PathBuf>,
    pub lint_conf: Option<PathBuf>,
    pub use_helmignore: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            target_branch: DEFAULT_TARGET_BRANCH.to_string(),
            since: DEFAULT_SINCE.to_string(),
            build_id: String::new(),
            chart_dirs: vec![PathBuf::from(DEFAULT_CHART_DIR)],
            excluded_charts: Vec::new(),
            charts: Vec::new(),
            all: false,
            chart_repos: Vec::new(),
            helm_repo_extra_args: Vec::new(),
            helm_extra_args: String::new(),
            helm_lint_extra_args: String::new(),
            helm_dependency_extra_args: String::new(),
            additional_commands: Vec::new(),
            namespace: None,
            release_label: DEFAULT_RELEASE_LABEL.to_string(),
            exclude_deprecated: false,
            skip_missing_values: false,
            upgrade: false,
            print_logs: true,
            skip_clean_up: false,
            check_version_increment: true,
            validate_chart_schema: true,
            validate_yaml: true,
            validate_maintainers: true,
            chart_yaml_schema: None,
            lint_conf: None,
            use_helmignore: true,
        }
    }
}

impl TestConfig {
    /// Loads the config from `explicit`, or from the first config file found
    /// in `search_dirs`. Defaults are used when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or has an
    /// unsupported extension.
    pub fn load(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => CONFIG_FILE_NAMES
                .iter()
                .find_map(|name| locate_file(name, search_dirs)),
        };

        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or has an
    /// unsupported extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => {
                serde_yml::from_str(&content).map_err(|source| ConfigError::ParseYaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            }),
            Some("json") => {
                serde_json::from_str(&content).map_err(|source| ConfigError::ParseJson {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Checks option combinations that cannot be expressed by the types.
    ///
    /// # Errors
    ///
    /// Returns the first invalid combination found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.all && !self.charts.is_empty() {
            return Err(ConfigError::AllWithCharts);
        }
        if self.namespace.is_some() && self.release_label.trim().is_empty() {
            return Err(ConfigError::NamespaceWithoutReleaseLabel);
        }
        if self.chart_dirs.is_empty() {
            return Err(ConfigError::NoChartDirs);
        }
        self.parsed_chart_repos()?;
        self.parsed_repo_extra_args()?;
        Ok(())
    }

    /// Parses `chart-repos` entries of the form `name=url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidChartRepo`] for a malformed entry.
    pub fn parsed_chart_repos(&self) -> Result<Vec<ChartRepo>, ConfigError> {
        self.chart_repos
            .iter()
            .map(|entry| {
                split_pair(entry)
                    .map(|(name, url)| ChartRepo {
                        name: name.to_string(),
                        url: url.to_string(),
                    })
                    .ok_or_else(|| ConfigError::InvalidChartRepo {
                        entry: entry.clone(),
                    })
            })
            .collect()
    }

    /// Extra `helm repo add` arguments for the repository called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepoExtraArgs`] for a malformed entry.
    pub fn repo_extra_args(&self, name: &str) -> Result<Option<String>, ConfigError> {
        Ok(self
            .parsed_repo_extra_args()?
            .into_iter()
            .find(|(repo, _)| repo == name)
            .map(|(_, args)| args))
    }

    fn parsed_repo_extra_args(&self) -> Result<Vec<(String, String)>, ConfigError> {
        self.helm_repo_extra_args
            .iter()
            .map(|entry| {
                split_pair(entry)
                    .map(|(name, args)| (name.to_string(), args.to_string()))
                    .ok_or_else(|| ConfigError::InvalidRepoExtraArgs {
                        entry: entry.clone(),
                    })
            })
            .collect()
    }

    /// Resolves the schema and lint config needed by the enabled checks.
    ///
    /// Explicitly configured paths win. Otherwise the well-known file names are
    /// searched in `search_dirs`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLintFile`] if an enabled check has no file.
    pub fn resolve_lint_files(&self, search_dirs: &[PathBuf]) -> Result<LintFiles, ConfigError> {
        let chart_schema = if self.validate_chart_schema {
            Some(resolve_file(
                self.chart_yaml_schema.as_deref(),
                SCHEMA_FILE,
                "chart schema validation",
                search_dirs,
            )?)
        } else {
            None
        };

        let lint_conf = if self.validate_yaml {
            Some(resolve_file(
                self.lint_conf.as_deref(),
                LINT_CONF_FILE,
                "YAML linting",
                search_dirs,
            )?)
        } else {
            None
        };

        Ok(LintFiles {
            chart_schema,
            lint_conf,
        })
    }
}

fn split_pair(entry: &str) -> Option<(&str, &str)> {
    let (name, value) = entry.split_once('=')?;
    let name = name.trim();
    let value = value.trim();
    (!name.is_empty() && !value.is_empty()).then_some((name, value))
}

fn resolve_file(
    explicit: Option<&Path>,
    name: &str,
    check: &'static str,
    search_dirs: &[PathBuf],
) -> Result<PathBuf, ConfigError> {
    let found = match explicit {
        Some(path) => path.is_file().then(|| path.to_path_buf()),
        None => locate_file(name, search_dirs),
    };

    found.ok_or_else(|| ConfigError::MissingLintFile {
        file: explicit.map_or_else(|| name.to_string(), |p| p.display().to_string()),
        check,
    })
}
