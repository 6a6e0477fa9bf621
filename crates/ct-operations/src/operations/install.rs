use std::path::{Path, PathBuf};

use ct_chart::{ChartError, TestConfig};
use ct_core::Chart;
use ct_version::breaking_change_allowed;
use tracing::{info, warn};

use super::context::Collaborators;
use super::scope::{CleanupPolicy, InstallParams, InstallScope};
use crate::Result;
use crate::error::OperationError;

/// Where the previous revision of the repository is checked out.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeContext<'a> {
    pub previous_root: &'a Path,
}

/// Install options, read once from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    pub namespace: Option<String>,
    pub build_id: String,
    pub release_label: String,
    /// Skip upgrade runs for values files the previous revision lacks.
    pub skip_missing_values: bool,
    pub cleanup: CleanupPolicy,
}

impl InstallSettings {
    #[must_use]
    pub fn from_config(config: &TestConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            build_id: config.build_id.clone(),
            release_label: config.release_label.clone(),
            skip_missing_values: config.skip_missing_values,
            cleanup: CleanupPolicy {
                print_logs: config.print_logs,
                skip_clean_up: config.skip_clean_up,
            },
        }
    }
}

/// Installs, tests and optionally upgrade-tests charts.
///
/// Every attempt runs inside an [`InstallScope`], so its release and
/// namespace are cleaned up before the next attempt starts.
pub struct InstallChain<'a> {
    collaborators: &'a Collaborators,
    settings: &'a InstallSettings,
}

fn stage_failed(
    stage: &'static str,
    chart: &Chart,
) -> impl FnOnce(OperationError) -> OperationError {
    let chart = chart.name().to_string();
    move |source| OperationError::InstallFailed {
        stage,
        chart,
        source: Box::new(source),
    }
}

fn located(root: Option<&Path>, path: &Path) -> PathBuf {
    root.map_or_else(|| path.to_path_buf(), |root| root.join(path))
}

impl<'a> InstallChain<'a> {
    #[must_use]
    pub fn new(collaborators: &'a Collaborators, settings: &'a InstallSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    /// With an upgrade context, upgrades from the previous revision (when the
    /// version change permits it) and upgrades the chart onto itself. Then
    /// installs the chart from scratch.
    ///
    /// # Errors
    ///
    /// Returns the first fatal install, upgrade or test failure.
    pub fn install(&self, chart: &Chart, upgrade: Option<UpgradeContext<'_>>) -> Result<()> {
        if let Some(upgrade) = upgrade {
            info!(chart = %chart, "testing upgrades");
            self.upgrade_from_previous(chart, upgrade)?;
            self.upgrade_release(chart, None, chart, true)?;
        }

        info!(chart = %chart, "installing chart");
        self.install_fresh(chart)
    }

    fn upgrade_from_previous(&self, chart: &Chart, upgrade: UpgradeContext<'_>) -> Result<()> {
        let previous = match self
            .collaborators
            .charts
            .read_chart(upgrade.previous_root, chart.path())
        {
            Ok(previous) => Some(previous),
            Err(OperationError::Chart(ChartError::NotAChart { .. })) => None,
            Err(e) => {
                warn!(
                    chart = %chart.name(),
                    error = %e,
                    "cannot read previous revision, skipping upgrade test"
                );
                return Ok(());
            }
        };

        let old_version = previous.as_ref().map_or("", Chart::version);
        let breaking = breaking_change_allowed(old_version, chart.version())?;
        if breaking.is_allowed() {
            info!(
                chart = %chart.name(),
                old_version,
                new_version = chart.version(),
                reason = %breaking,
                "skipping upgrade test from previous revision"
            );
            return Ok(());
        }

        let Some(previous) = previous else {
            return Ok(());
        };
        self.upgrade_release(&previous, Some(upgrade.previous_root), chart, false)
    }

    /// Installs `old`, tests it, upgrades to `new` and tests again, once per
    /// values file of `new`.
    ///
    /// Unless `old_must_pass`, failures installing or testing `old` skip the
    /// run instead of failing it.
    fn upgrade_release(
        &self,
        old: &Chart,
        old_root: Option<&Path>,
        new: &Chart,
        old_must_pass: bool,
    ) -> Result<()> {
        let old_chart = located(old_root, old.path());

        for values in new.values_file_runs() {
            let old_values = match values {
                None => None,
                Some(values) => {
                    let counterpart = values
                        .file_name()
                        .and_then(|name| old.ci_values_file_named(name));
                    match counterpart {
                        Some(old_values) => Some(located(old_root, old_values)),
                        None if self.settings.skip_missing_values => {
                            info!(
                                chart = %new.name(),
                                values = %values.display(),
                                "values file missing in previous revision, skipping upgrade run"
                            );
                            continue;
                        }
                        None => Some(values.to_path_buf()),
                    }
                }
            };

            let scope = self.open_scope(new);
            let params = scope.params();
            self.create_namespace(new, params)?;

            let old_installed = self
                .collaborators
                .package_manager
                .install(&old_chart, old_values.as_deref(), &params.namespace, &params.release)
                .map_err(stage_failed("install", new))
                .and_then(|()| self.test_release(new, params));
            if let Err(e) = old_installed {
                if old_must_pass {
                    return Err(e);
                }
                info!(
                    chart = %new.name(),
                    error = %e,
                    "previous revision failed to install or test, skipping upgrade run"
                );
                continue;
            }

            self.collaborators
                .package_manager
                .upgrade(new.path(), &params.namespace, &params.release)
                .map_err(stage_failed("upgrade", new))?;
            self.test_release(new, params)?;

            scope.close();
        }

        Ok(())
    }

    fn install_fresh(&self, chart: &Chart) -> Result<()> {
        for values in chart.values_file_runs() {
            let scope = self.open_scope(chart);
            let params = scope.params();
            self.create_namespace(chart, params)?;

            self.collaborators
                .package_manager
                .install(chart.path(), values, &params.namespace, &params.release)
                .map_err(stage_failed("install", chart))?;
            self.test_release(chart, params)?;

            scope.close();
        }
        Ok(())
    }

    fn open_scope(&self, chart: &Chart) -> InstallScope<'a> {
        let params = InstallParams::generate(
            chart,
            self.settings.namespace.as_deref(),
            &self.settings.build_id,
            &self.settings.release_label,
        );
        InstallScope::new(
            self.collaborators.package_manager.as_ref(),
            self.collaborators.cluster.as_ref(),
            params,
            self.settings.cleanup,
        )
    }

    fn create_namespace(&self, chart: &Chart, params: &InstallParams) -> Result<()> {
        if !params.owns_namespace {
            return Ok(());
        }
        self.collaborators
            .cluster
            .create_namespace(&params.namespace)
            .map_err(stage_failed("namespace creation", chart))
    }

    fn test_release(&self, chart: &Chart, params: &InstallParams) -> Result<()> {
        self.collaborators
            .cluster
            .wait_for_workloads(&params.namespace, &params.selector)
            .map_err(stage_failed("waiting for workloads", chart))?;
        self.collaborators
            .package_manager
            .test(&params.namespace, &params.release)
            .map_err(stage_failed("release test", chart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{
        MockChartReader, MockGitProvider, MockToolchain, make_chart, make_chart_with_values,
    };
    use std::sync::Arc;

    const PREVIOUS_ROOT: &str = "/tmp/previous";

    fn settings() -> InstallSettings {
        InstallSettings::from_config(&TestConfig {
            print_logs: false,
            ..TestConfig::default()
        })
    }

    fn collaborators(tools: &Arc<MockToolchain>, reader: MockChartReader) -> Collaborators {
        let mut collaborators = tools.collaborators(Arc::new(MockGitProvider::new()));
        collaborators.charts = Arc::new(reader);
        collaborators
    }

    fn upgrade() -> UpgradeContext<'static> {
        UpgradeContext {
            previous_root: Path::new(PREVIOUS_ROOT),
        }
    }

    #[test]
    fn fresh_install_runs_each_values_file_in_own_scope() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new());
        let collaborators = collaborators(&tools, MockChartReader::new());
        let settings = settings();
        let chart = make_chart_with_values(
            "charts/foo",
            "foo",
            "1.0.0",
            &["charts/foo/ci/a-values.yaml", "charts/foo/ci/b-values.yaml"],
        );

        InstallChain::new(&collaborators, &settings).install(&chart, None)?;

        assert_eq!(tools.count_calls("create namespace"), 2);
        assert_eq!(tools.count_calls("install charts/foo charts/foo/ci/a-values.yaml"), 1);
        assert_eq!(tools.count_calls("install charts/foo charts/foo/ci/b-values.yaml"), 1);
        assert_eq!(tools.count_calls("uninstall"), 2);
        assert_eq!(tools.count_calls("delete namespace"), 2);

        let calls = tools.calls();
        let first_cleanup = calls
            .iter()
            .position(|c| c.starts_with("delete namespace"))
            .unwrap_or(usize::MAX);
        let second_install = calls
            .iter()
            .position(|c| c.starts_with("install charts/foo charts/foo/ci/b-values.yaml"))
            .unwrap_or(0);
        assert!(first_cleanup < second_install);
        Ok(())
    }

    #[test]
    fn cleanup_runs_once_whatever_stage_fails() -> anyhow::Result<()> {
        for failing in ["create namespace", "install", "wait", "test"] {
            let tools = Arc::new(MockToolchain::new().failing_on(failing));
            let collaborators = collaborators(&tools, MockChartReader::new());
            let settings = settings();
            let chart = make_chart("charts/foo", "foo", "1.0.0");

            let result = InstallChain::new(&collaborators, &settings).install(&chart, None);

            assert!(
                matches!(result, Err(OperationError::InstallFailed { .. })),
                "{failing} should fail the install"
            );
            assert_eq!(tools.count_calls("uninstall"), 1, "{failing}");
            assert_eq!(tools.count_calls("delete namespace"), 1, "{failing}");
        }
        Ok(())
    }

    #[test]
    fn shared_namespace_is_neither_created_nor_deleted() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new());
        let collaborators = collaborators(&tools, MockChartReader::new());
        let settings = InstallSettings::from_config(&TestConfig {
            namespace: Some("ci".to_string()),
            print_logs: false,
            ..TestConfig::default()
        });
        let chart = make_chart("charts/foo", "foo", "1.0.0");

        InstallChain::new(&collaborators, &settings).install(&chart, None)?;

        assert_eq!(tools.count_calls("create namespace"), 0);
        assert_eq!(tools.count_calls("delete namespace"), 0);
        assert_eq!(tools.count_calls("uninstall ci "), 1);
        Ok(())
    }

    #[test]
    fn compatible_bump_runs_all_three_states() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new());
        let reader = MockChartReader::new()
            .with_chart(PREVIOUS_ROOT, make_chart("charts/foo", "foo", "1.2.0"));
        let collaborators = collaborators(&tools, reader);
        let settings = settings();
        let chart = make_chart("charts/foo", "foo", "1.2.1");

        InstallChain::new(&collaborators, &settings).install(&chart, Some(upgrade()))?;

        let installs: Vec<String> = tools
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("install") || c.starts_with("upgrade"))
            .map(|c| c.split(' ').take(2).collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(
            installs,
            vec![
                "install /tmp/previous/charts/foo",
                "upgrade charts/foo",
                "install charts/foo",
                "upgrade charts/foo",
                "install charts/foo",
            ]
        );
        assert_eq!(tools.count_calls("uninstall"), 3);
        Ok(())
    }

    #[test]
    fn major_bump_skips_upgrade_from_previous() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new());
        let reader = MockChartReader::new()
            .with_chart(PREVIOUS_ROOT, make_chart("charts/foo", "foo", "1.2.0"));
        let collaborators = collaborators(&tools, reader);
        let settings = settings();
        let chart = make_chart("charts/foo", "foo", "2.0.0");

        InstallChain::new(&collaborators, &settings).install(&chart, Some(upgrade()))?;

        assert_eq!(tools.count_calls("install /tmp/previous"), 0);
        assert_eq!(tools.count_calls("install charts/foo"), 2);
        assert_eq!(tools.count_calls("upgrade charts/foo"), 1);
        Ok(())
    }

    #[test]
    fn new_chart_skips_upgrade_from_previous() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new());
        let collaborators = collaborators(&tools, MockChartReader::new());
        let settings = settings();
        let chart = make_chart("charts/foo", "foo", "0.1.0");

        InstallChain::new(&collaborators, &settings).install(&chart, Some(upgrade()))?;

        assert_eq!(tools.count_calls("install /tmp/previous"), 0);
        assert_eq!(tools.count_calls("upgrade"), 1);
        Ok(())
    }

    #[test]
    fn broken_previous_revision_is_soft_skipped() -> anyhow::Result<()> {
        let tools = Arc::new(MockToolchain::new().failing_on("install /tmp/previous"));
        let reader = MockChartReader::new()
            .with_chart(PREVIOUS_ROOT, make_chart("charts/foo", "foo", "1.2.0"));
        let collaborators = collaborators(&tools, reader);
        let settings = settings();
        let chart = make_chart("charts/foo", "foo", "1.2.1");

        InstallChain::new(&collaborators, &settings).install(&chart, Some(upgrade()))?;

        assert_eq!(tools.count_calls("upgrade"), 1);
        assert_eq!(tools.count_calls("uninstall"), 3);
        Ok(())
    }

    #[test]
    fn failing_upgrade_from_previous_is_fatal() {
        let tools = Arc::new(MockToolchain::new().failing_on("upgrade"));
        let reader = MockChartReader::new()
            .with_chart(PREVIOUS_ROOT, make_chart("charts/foo", "foo", "1.2.0"));
        let collaborators = collaborators(&tools, reader);
        let settings = settings();
        let chart = make_chart("charts/foo", "foo", "1.2.1");

        let result = InstallChain::new(&collaborators, &settings).install(&chart, Some(upgrade()));

        assert!(matches!(
            result,
            Err(OperationError::InstallFailed { stage: "upgrade", .. })
        ));
        assert_eq!(tools.count_calls("install charts/foo"), 0);
        assert_eq!(tools.count_calls("uninstall"), 1);
    }

    #[test]
    fn missing_values_file_in_previous_revision() -> anyhow::Result<()> {
        let previous = make_chart_with_values(
            "charts/foo",
            "foo",
            "1.2.0",
            &["charts/foo/ci/a-values.yaml"],
        );
        let chart = make_chart_with_values(
            "charts/foo",
            "foo",
            "1.2.1",
            &["charts/foo/ci/a-values.yaml", "charts/foo/ci/renamed-values.yaml"],
        );

        let tools = Arc::new(MockToolchain::new());
        let reader = MockChartReader::new().with_chart(PREVIOUS_ROOT, previous.clone());
        let collaborators = collaborators(&tools, reader);
        let settings = settings();
        InstallChain::new(&collaborators, &settings).upgrade_release(
            &previous,
            Some(Path::new(PREVIOUS_ROOT)),
            &chart,
            false,
        )?;
        assert_eq!(
            tools.count_calls("install /tmp/previous/charts/foo /tmp/previous/charts/foo/ci/a-values.yaml"),
            1
        );
        assert_eq!(
            tools.count_calls("install /tmp/previous/charts/foo charts/foo/ci/renamed-values.yaml"),
            1
        );

        let skipping = Arc::new(MockToolchain::new());
        let reader = MockChartReader::new().with_chart(PREVIOUS_ROOT, previous.clone());
        let collaborators = self::collaborators(&skipping, reader);
        let settings = InstallSettings {
            skip_missing_values: true,
            ..settings
        };
        InstallChain::new(&collaborators, &settings).upgrade_release(
            &previous,
            Some(Path::new(PREVIOUS_ROOT)),
            &chart,
            false,
        )?;
        assert_eq!(skipping.count_calls("install"), 1);
        assert_eq!(skipping.count_calls("upgrade"), 1);
        Ok(())
    }
}
