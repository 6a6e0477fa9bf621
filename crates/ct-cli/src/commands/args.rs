use std::path::PathBuf;

use clap::Args;
use ct_chart::TestConfig;

/// Options shared by every command that selects charts.
#[derive(Args, Debug)]
pub(crate) struct CommonArgs {
    /// Git remote used to identify changed charts
    #[arg(long, env = "CT_REMOTE")]
    pub(crate) remote: Option<String>,

    /// Branch changes are compared against
    #[arg(long, env = "CT_TARGET_BRANCH")]
    pub(crate) target_branch: Option<String>,

    /// Revision changes are computed up to
    #[arg(long, env = "CT_SINCE")]
    pub(crate) since: Option<String>,

    /// Build id appended to generated namespaces
    #[arg(long, env = "CT_BUILD_ID")]
    pub(crate) build_id: Option<String>,

    /// Directories containing charts (comma-separated)
    #[arg(long, env = "CT_CHART_DIRS", value_delimiter = ',')]
    pub(crate) chart_dirs: Vec<PathBuf>,

    /// Chart directory names to skip (comma-separated)
    #[arg(long, env = "CT_EXCLUDED_CHARTS", value_delimiter = ',')]
    pub(crate) excluded_charts: Vec<String>,

    /// Charts to test instead of the changed ones (comma-separated)
    #[arg(long, env = "CT_CHARTS", value_delimiter = ',')]
    pub(crate) charts: Vec<PathBuf>,

    /// Test every chart, changed or not
    #[arg(long, env = "CT_ALL", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) all: Option<bool>,

    /// Chart repositories to add, as name=url (comma-separated)
    #[arg(long, env = "CT_CHART_REPOS", value_delimiter = ',')]
    pub(crate) chart_repos: Vec<String>,

    /// Extra `helm repo add` arguments per repository, as name=args
    #[arg(long, env = "CT_HELM_REPO_EXTRA_ARGS", value_delimiter = ',')]
    pub(crate) helm_repo_extra_args: Vec<String>,

    /// Extra arguments for `helm dependency build`
    #[arg(long, env = "CT_HELM_DEPENDENCY_EXTRA_ARGS", allow_hyphen_values = true)]
    pub(crate) helm_dependency_extra_args: Option<String>,

    /// Skip charts marked as deprecated
    #[arg(long, env = "CT_EXCLUDE_DEPRECATED", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) exclude_deprecated: Option<bool>,

    /// Ignore changes to files matched by the chart's .helmignore
    #[arg(long, env = "CT_USE_HELMIGNORE", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) use_helmignore: Option<bool>,
}

impl CommonArgs {
    pub(crate) fn apply(&self, config: &mut TestConfig) {
        override_value(&mut config.remote, self.remote.as_ref());
        override_value(&mut config.target_branch, self.target_branch.as_ref());
        override_value(&mut config.since, self.since.as_ref());
        override_value(&mut config.build_id, self.build_id.as_ref());
        override_list(&mut config.chart_dirs, &self.chart_dirs);
        override_list(&mut config.excluded_charts, &self.excluded_charts);
        override_list(&mut config.charts, &self.charts);
        override_value(&mut config.all, self.all.as_ref());
        override_list(&mut config.chart_repos, &self.chart_repos);
        override_list(&mut config.helm_repo_extra_args, &self.helm_repo_extra_args);
        override_value(
            &mut config.helm_dependency_extra_args,
            self.helm_dependency_extra_args.as_ref(),
        );
        override_value(&mut config.exclude_deprecated, self.exclude_deprecated.as_ref());
        override_value(&mut config.use_helmignore, self.use_helmignore.as_ref());
    }
}

/// Options of the lint checks.
#[derive(Args, Debug)]
pub(crate) struct LintArgs {
    /// Shell commands run per chart; {{ .Path }} is replaced by the chart path
    #[arg(long, env = "CT_ADDITIONAL_COMMANDS", value_delimiter = ',')]
    pub(crate) additional_commands: Vec<String>,

    /// Extra arguments for `helm lint`
    #[arg(long, env = "CT_HELM_LINT_EXTRA_ARGS", allow_hyphen_values = true)]
    pub(crate) helm_lint_extra_args: Option<String>,

    /// Require the chart version to be incremented
    #[arg(long, env = "CT_CHECK_VERSION_INCREMENT", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) check_version_increment: Option<bool>,

    /// Validate Chart.yaml against the chart schema
    #[arg(long, env = "CT_VALIDATE_CHART_SCHEMA", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) validate_chart_schema: Option<bool>,

    /// Lint YAML files with yamllint
    #[arg(long, env = "CT_VALIDATE_YAML", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) validate_yaml: Option<bool>,

    /// Check that maintainers are accounts on the hosting service
    #[arg(long, env = "CT_VALIDATE_MAINTAINERS", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) validate_maintainers: Option<bool>,

    /// Schema file for Chart.yaml validation
    #[arg(long, env = "CT_CHART_YAML_SCHEMA")]
    pub(crate) chart_yaml_schema: Option<PathBuf>,

    /// yamllint configuration file
    #[arg(long, env = "CT_LINT_CONF")]
    pub(crate) lint_conf: Option<PathBuf>,
}

impl LintArgs {
    pub(crate) fn apply(&self, config: &mut TestConfig) {
        override_list(&mut config.additional_commands, &self.additional_commands);
        override_value(
            &mut config.helm_lint_extra_args,
            self.helm_lint_extra_args.as_ref(),
        );
        override_value(
            &mut config.check_version_increment,
            self.check_version_increment.as_ref(),
        );
        override_value(
            &mut config.validate_chart_schema,
            self.validate_chart_schema.as_ref(),
        );
        override_value(&mut config.validate_yaml, self.validate_yaml.as_ref());
        override_value(
            &mut config.validate_maintainers,
            self.validate_maintainers.as_ref(),
        );
        if let Some(schema) = &self.chart_yaml_schema {
            config.chart_yaml_schema = Some(schema.clone());
        }
        if let Some(lint_conf) = &self.lint_conf {
            config.lint_conf = Some(lint_conf.clone());
        }
    }
}

/// Options of install and upgrade testing.
#[derive(Args, Debug)]
pub(crate) struct InstallArgs {
    /// Extra arguments for `helm install` and `helm upgrade`
    #[arg(long, env = "CT_HELM_EXTRA_ARGS", allow_hyphen_values = true)]
    pub(crate) helm_extra_args: Option<String>,

    /// Install every release into this existing namespace
    #[arg(long, env = "CT_NAMESPACE")]
    pub(crate) namespace: Option<String>,

    /// Label selecting a release's resources; required with --namespace
    #[arg(long, env = "CT_RELEASE_LABEL")]
    pub(crate) release_label: Option<String>,

    /// Test in-place upgrades from the previous revision
    #[arg(long, env = "CT_UPGRADE", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) upgrade: Option<bool>,

    /// Skip upgrade runs whose values file is missing in the previous revision
    #[arg(long, env = "CT_SKIP_MISSING_VALUES", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) skip_missing_values: Option<bool>,

    /// Print events, descriptions and logs of the release's pods on cleanup
    #[arg(long, env = "CT_PRINT_LOGS", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) print_logs: Option<bool>,

    /// Leave releases and namespaces in place
    #[arg(long, env = "CT_SKIP_CLEAN_UP", num_args = 0..=1, default_missing_value = "true")]
    pub(crate) skip_clean_up: Option<bool>,
}

impl InstallArgs {
    pub(crate) fn apply(&self, config: &mut TestConfig) {
        override_value(&mut config.helm_extra_args, self.helm_extra_args.as_ref());
        if let Some(namespace) = &self.namespace {
            config.namespace = Some(namespace.clone());
        }
        override_value(&mut config.release_label, self.release_label.as_ref());
        override_value(&mut config.upgrade, self.upgrade.as_ref());
        override_value(
            &mut config.skip_missing_values,
            self.skip_missing_values.as_ref(),
        );
        override_value(&mut config.print_logs, self.print_logs.as_ref());
        override_value(&mut config.skip_clean_up, self.skip_clean_up.as_ref());
    }
}

fn override_value<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn override_list<T: Clone>(target: &mut Vec<T>, values: &[T]) {
    if !values.is_empty() {
        *target = values.to_vec();
    }
}
