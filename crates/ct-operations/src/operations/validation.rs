use std::fmt;
use std::path::{Component, Path, PathBuf};

use ct_chart::{LintFiles, TestConfig, parse_chart_yaml};
use ct_core::{CHART_YAML, Chart, VALUES_YAML};
use ct_version::is_version_incremented;
use tracing::{debug, info};

use super::context::Collaborators;
use super::select::target_revision;
use crate::Result;
use crate::error::OperationError;
use crate::providers::hosting_domain;
use crate::traits::GitProvider;

const PATH_PLACEHOLDERS: &[&str] = &["{{ .Path }}", "{{.Path}}"];

/// One step of the lint pipeline, with the settings it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationCheck {
    /// The version must be greater than the one at `revision`.
    VersionIncrement { revision: String },
    ChartSchema { schema: PathBuf },
    YamlLint { lint_conf: PathBuf },
    /// Maintainers must be accounts on `domain`.
    Maintainers { domain: String },
    /// A shell command; `{{ .Path }}` is replaced by the chart path.
    CustomCommand { command: String },
    /// `helm lint`, once per values file.
    HelmLint,
}

impl fmt::Display for ValidationCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VersionIncrement { .. } => write!(f, "version increment check"),
            Self::ChartSchema { .. } => write!(f, "chart schema validation"),
            Self::YamlLint { .. } => write!(f, "YAML lint"),
            Self::Maintainers { .. } => write!(f, "maintainer validation"),
            Self::CustomCommand { command } => write!(f, "command '{command}'"),
            Self::HelmLint => write!(f, "helm lint"),
        }
    }
}

/// The ordered checks every chart goes through when linting.
///
/// Built once per run. The first failing check stops the chain for that
/// chart.
#[derive(Debug, Clone, Default)]
pub struct ValidationChain {
    checks: Vec<ValidationCheck>,
}

impl ValidationChain {
    #[must_use]
    pub fn new(checks: Vec<ValidationCheck>) -> Self {
        Self { checks }
    }

    /// Builds the chain from the enabled options.
    ///
    /// # Errors
    ///
    /// Returns an error if maintainer validation is enabled but the hosting
    /// domain of the configured remote cannot be determined.
    pub fn assemble(
        config: &TestConfig,
        lint_files: &LintFiles,
        git: &dyn GitProvider,
        repo_root: &Path,
    ) -> Result<Self> {
        let mut checks = Vec::new();

        if config.check_version_increment {
            checks.push(ValidationCheck::VersionIncrement {
                revision: target_revision(config),
            });
        }
        if let Some(schema) = &lint_files.chart_schema {
            checks.push(ValidationCheck::ChartSchema {
                schema: schema.clone(),
            });
        }
        if let Some(lint_conf) = &lint_files.lint_conf {
            checks.push(ValidationCheck::YamlLint {
                lint_conf: lint_conf.clone(),
            });
        }
        if config.validate_maintainers {
            let url = git
                .remote_url(repo_root, &config.remote)?
                .ok_or_else(|| OperationError::RemoteNotFound {
                    remote: config.remote.clone(),
                })?;
            checks.push(ValidationCheck::Maintainers {
                domain: hosting_domain(&url)?,
            });
        }
        for command in &config.additional_commands {
            checks.push(ValidationCheck::CustomCommand {
                command: command.clone(),
            });
        }
        checks.push(ValidationCheck::HelmLint);

        Ok(Self { checks })
    }

    #[must_use]
    pub fn checks(&self) -> &[ValidationCheck] {
        &self.checks
    }

    /// Runs the checks in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::CheckFailed`] naming the failing check.
    pub fn validate(
        &self,
        chart: &Chart,
        collaborators: &Collaborators,
        repo_root: &Path,
    ) -> Result<()> {
        info!(chart = %chart, "linting chart");
        for check in &self.checks {
            debug!(chart = %chart.name(), check = %check, "running check");
            check.run(chart, collaborators, repo_root)?;
        }
        Ok(())
    }
}

fn check_failed(check: String, chart: &Chart) -> impl FnOnce(OperationError) -> OperationError {
    let chart = chart.name().to_string();
    move |source| OperationError::CheckFailed {
        check,
        chart,
        source: Box::new(source),
    }
}

impl ValidationCheck {
    fn run(&self, chart: &Chart, collaborators: &Collaborators, repo_root: &Path) -> Result<()> {
        match self {
            Self::VersionIncrement { revision } => {
                check_version_increment(chart, collaborators.git.as_ref(), repo_root, revision)
                    .map_err(check_failed(self.to_string(), chart))
            }
            Self::ChartSchema { schema } => collaborators
                .schema_validator
                .validate_schema(&chart.path().join(CHART_YAML), schema)
                .map_err(check_failed(self.to_string(), chart)),
            Self::YamlLint { lint_conf } => {
                for file in yaml_files(chart, repo_root) {
                    collaborators
                        .style_linter
                        .lint_style(&file, lint_conf)
                        .map_err(check_failed(
                            format!("YAML lint of '{}'", file.display()),
                            chart,
                        ))?;
                }
                Ok(())
            }
            Self::Maintainers { domain } => {
                validate_maintainers(chart, collaborators, domain)
                    .map_err(check_failed(self.to_string(), chart))
            }
            Self::CustomCommand { command } => {
                let path = chart.path().display().to_string();
                let command = PATH_PLACEHOLDERS
                    .iter()
                    .fold(command.clone(), |cmd, placeholder| cmd.replace(placeholder, &path));
                collaborators
                    .command_runner
                    .run(&command)
                    .map_err(check_failed(self.to_string(), chart))
            }
            Self::HelmLint => {
                for values in chart.values_file_runs() {
                    let check = match values {
                        Some(values) => format!("helm lint with '{}'", values.display()),
                        None => self.to_string(),
                    };
                    collaborators
                        .package_manager
                        .lint(chart.path(), values)
                        .map_err(check_failed(check, chart))?;
                }
                Ok(())
            }
        }
    }
}

fn check_version_increment(
    chart: &Chart,
    git: &dyn GitProvider,
    repo_root: &Path,
    revision: &str,
) -> Result<()> {
    let chart_yaml: PathBuf = chart
        .path()
        .join(CHART_YAML)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if !git.file_exists_at_revision(repo_root, revision, &chart_yaml)? {
        info!(chart = %chart.name(), revision, "chart is new, skipping version check");
        return Ok(());
    }

    let content = git.read_file_at_revision(repo_root, revision, &chart_yaml)?;
    let previous = parse_chart_yaml(&content, &chart_yaml)?;

    if is_version_incremented(&previous.version, chart.version())? {
        Ok(())
    } else {
        Err(OperationError::VersionNotIncremented {
            chart: chart.name().to_string(),
            old_version: previous.version,
            new_version: chart.version().to_string(),
        })
    }
}

fn yaml_files(chart: &Chart, repo_root: &Path) -> Vec<PathBuf> {
    let mut files = vec![chart.path().join(CHART_YAML)];
    let values = chart.path().join(VALUES_YAML);
    if repo_root.join(&values).is_file() {
        files.push(values);
    }
    files.extend(chart.ci_values_files().iter().cloned());
    files
}

fn validate_maintainers(chart: &Chart, collaborators: &Collaborators, domain: &str) -> Result<()> {
    let maintainers = chart.maintainers();

    if chart.is_deprecated() {
        if maintainers.is_empty() {
            return Ok(());
        }
        return Err(OperationError::DeprecatedChartHasMaintainers {
            chart: chart.name().to_string(),
        });
    }

    if maintainers.is_empty() {
        return Err(OperationError::NoMaintainers {
            chart: chart.name().to_string(),
        });
    }

    for maintainer in maintainers {
        collaborators
            .account_validator
            .validate(domain, &maintainer.name)?;
    }
    Ok(())
}
