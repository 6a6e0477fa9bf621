use std::path::PathBuf;

use ct_chart::{LintFiles, TestConfig};
use ct_core::{CHART_YAML, Chart};
use ct_version::parse_version;
use tracing::{info, warn};

use super::context::Collaborators;
use super::install::{InstallChain, InstallSettings};
use super::previous_revision::PreviousRevision;
use super::results::{TestResult, TestResults};
use super::select::ChartSelector;
use super::validation::ValidationChain;
use crate::Result;
use crate::error::OperationError;

const MIN_HELM_MAJOR: u64 = 3;

/// Which pipelines a run executes for every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestMode {
    Lint,
    Install,
    LintAndInstall,
}

impl TestMode {
    #[must_use]
    pub fn lints(self) -> bool {
        matches!(self, Self::Lint | Self::LintAndInstall)
    }

    #[must_use]
    pub fn installs(self) -> bool {
        matches!(self, Self::Install | Self::LintAndInstall)
    }
}

/// Runs the selected charts through linting and/or install testing.
pub struct TestOperation {
    collaborators: Collaborators,
    repo_root: PathBuf,
    config: TestConfig,
    lint_files: LintFiles,
}

impl TestOperation {
    #[must_use]
    pub fn new(
        collaborators: Collaborators,
        repo_root: impl Into<PathBuf>,
        config: TestConfig,
        lint_files: LintFiles,
    ) -> Self {
        Self {
            collaborators,
            repo_root: repo_root.into(),
            config,
            lint_files,
        }
    }

    /// Processes every selected chart in order and aggregates the results.
    ///
    /// A chart failing lint or install only fails its own result.
    ///
    /// # Errors
    ///
    /// Returns an error, before or between charts, if charts cannot be
    /// selected or read, Helm is too old, a repository cannot be added, the
    /// previous revision cannot be checked out or a chart's dependencies
    /// cannot be built.
    pub fn execute(&self, mode: TestMode) -> Result<TestResults> {
        let selector = ChartSelector::new(
            self.collaborators.git.as_ref(),
            &self.repo_root,
            &self.config,
        );

        let dirs = selector.select()?;
        let charts = self.read_charts(&dirs)?;
        if charts.is_empty() {
            info!("no chart changes detected");
            return Ok(TestResults::aggregate(Vec::new()));
        }
        for chart in &charts {
            info!(chart = %chart, "selected chart");
        }

        self.check_helm_version()?;
        self.add_repositories()?;

        let chain = if mode.lints() {
            Some(ValidationChain::assemble(
                &self.config,
                &self.lint_files,
                self.collaborators.git.as_ref(),
                &self.repo_root,
            )?)
        } else {
            None
        };

        let previous = if mode.installs() && self.config.upgrade {
            Some(self.checkout_previous(&selector, &charts)?)
        } else {
            None
        };

        let settings = InstallSettings::from_config(&self.config);
        let mut results = Vec::with_capacity(charts.len());

        for chart in charts {
            self.build_dependencies(&chart)?;

            let outcome =
                self.process_chart(&chart, mode, chain.as_ref(), &settings, previous.as_ref());
            if let Err(e) = &outcome {
                warn!(chart = %chart.name(), error = %e, "chart failed");
            }
            results.push(TestResult::from_outcome(chart, outcome));
        }

        Ok(TestResults::aggregate(results))
    }

    fn process_chart(
        &self,
        chart: &Chart,
        mode: TestMode,
        chain: Option<&ValidationChain>,
        settings: &InstallSettings,
        previous: Option<&PreviousRevision>,
    ) -> Result<()> {
        if let Some(chain) = chain {
            chain.validate(chart, &self.collaborators, &self.repo_root)?;
        }

        if mode.installs() {
            InstallChain::new(&self.collaborators, settings)
                .install(chart, previous.map(PreviousRevision::upgrade_context))?;
        }

        Ok(())
    }

    fn read_charts(&self, dirs: &[PathBuf]) -> Result<Vec<Chart>> {
        let mut charts = Vec::with_capacity(dirs.len());
        for dir in dirs {
            let chart = self.collaborators.charts.read_chart(&self.repo_root, dir)?;
            if self.config.exclude_deprecated && chart.is_deprecated() {
                info!(chart = %chart.name(), "skipping deprecated chart");
                continue;
            }
            charts.push(chart);
        }
        Ok(charts)
    }

    fn check_helm_version(&self) -> Result<()> {
        let version = self.collaborators.package_manager.version()?;
        let parsed = parse_version(version.trim())?;
        if parsed.major < MIN_HELM_MAJOR {
            return Err(OperationError::UnsupportedHelmVersion { version });
        }
        Ok(())
    }

    fn add_repositories(&self) -> Result<()> {
        for repo in self.config.parsed_chart_repos()? {
            let extra_args: Vec<String> = self
                .config
                .repo_extra_args(&repo.name)?
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();

            self.collaborators
                .package_manager
                .add_repository(&repo.name, &repo.url, &extra_args)
                .map_err(|source| OperationError::AddRepository {
                    name: repo.name.clone(),
                    source: Box::new(source),
                })?;
        }
        Ok(())
    }

    fn checkout_previous(
        &self,
        selector: &ChartSelector<'_>,
        charts: &[Chart],
    ) -> Result<PreviousRevision> {
        self.collaborators.git.validate_repository(&self.repo_root)?;
        let merge_base = selector.merge_base()?;
        let previous = PreviousRevision::checkout(
            self.collaborators.git.clone(),
            &self.repo_root,
            &merge_base,
        )?;

        for chart in charts {
            let previous_chart = previous.path().join(chart.path());
            if !previous_chart.join(CHART_YAML).is_file() {
                continue;
            }
            if let Err(e) = self
                .collaborators
                .package_manager
                .build_dependencies(&previous_chart)
            {
                warn!(
                    chart = %chart.name(),
                    error = %e,
                    "failed to build dependencies of previous revision"
                );
            }
        }

        Ok(previous)
    }

    fn build_dependencies(&self, chart: &Chart) -> Result<()> {
        self.collaborators
            .package_manager
            .build_dependencies(chart.path())
            .map_err(|source| OperationError::DependencyBuild {
                chart: chart.path().to_path_buf(),
                source: Box::new(source),
            })
    }
}
