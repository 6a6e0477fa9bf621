use std::path::Path;

use tracing::info;

use super::process::{ProcessExecutor, split_args};
use crate::Result;
use crate::traits::PackageManager;

const HELM: &str = "helm";

/// [`PackageManager`] backed by the `helm` binary.
#[derive(Debug, Clone)]
pub struct Helm {
    executor: ProcessExecutor,
    extra_args: Vec<String>,
    lint_extra_args: Vec<String>,
    dependency_extra_args: Vec<String>,
}

impl Helm {
    #[must_use]
    pub fn new(executor: ProcessExecutor) -> Self {
        Self {
            executor,
            extra_args: Vec::new(),
            lint_extra_args: Vec::new(),
            dependency_extra_args: Vec::new(),
        }
    }

    /// Arguments appended to `install` and `upgrade`.
    #[must_use]
    pub fn with_extra_args(mut self, args: &str) -> Self {
        self.extra_args = split_args(args);
        self
    }

    #[must_use]
    pub fn with_lint_extra_args(mut self, args: &str) -> Self {
        self.lint_extra_args = split_args(args);
        self
    }

    #[must_use]
    pub fn with_dependency_extra_args(mut self, args: &str) -> Self {
        self.dependency_extra_args = split_args(args);
        self
    }

    fn lint_args(&self, chart: &Path, values: Option<&Path>) -> Vec<String> {
        let mut args = vec!["lint".to_string(), path_arg(chart)];
        push_values(&mut args, values);
        args.extend(self.lint_extra_args.iter().cloned());
        args
    }

    fn install_args(
        &self,
        chart: &Path,
        values: Option<&Path>,
        namespace: &str,
        release: &str,
    ) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            release.to_string(),
            path_arg(chart),
            "--namespace".to_string(),
            namespace.to_string(),
            "--wait".to_string(),
        ];
        push_values(&mut args, values);
        args.extend(self.extra_args.iter().cloned());
        args
    }

    fn upgrade_args(&self, chart: &Path, namespace: &str, release: &str) -> Vec<String> {
        let mut args = vec![
            "upgrade".to_string(),
            release.to_string(),
            path_arg(chart),
            "--namespace".to_string(),
            namespace.to_string(),
            "--reuse-values".to_string(),
            "--wait".to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn push_values(args: &mut Vec<String>, values: Option<&Path>) {
    if let Some(values) = values {
        args.push("--values".to_string());
        args.push(path_arg(values));
    }
}

impl PackageManager for Helm {
    fn version(&self) -> Result<String> {
        self.executor
            .output(HELM, ["version", "--template", "{{ .Version }}"])
    }

    fn add_repository(&self, name: &str, url: &str, extra_args: &[String]) -> Result<()> {
        info!(repository = name, url, "adding chart repository");
        let mut args = vec!["repo".to_string(), "add".to_string(), name.to_string(), url.to_string()];
        args.extend(extra_args.iter().cloned());
        self.executor.run(HELM, args)
    }

    fn build_dependencies(&self, chart: &Path) -> Result<()> {
        info!(chart = %chart.display(), "building chart dependencies");
        let mut args = vec!["dependency".to_string(), "build".to_string(), path_arg(chart)];
        args.extend(self.dependency_extra_args.iter().cloned());
        self.executor.run(HELM, args)
    }

    fn lint(&self, chart: &Path, values: Option<&Path>) -> Result<()> {
        self.executor.run(HELM, self.lint_args(chart, values))
    }

    fn install(
        &self,
        chart: &Path,
        values: Option<&Path>,
        namespace: &str,
        release: &str,
    ) -> Result<()> {
        info!(chart = %chart.display(), namespace, release, "installing chart");
        self.executor
            .run(HELM, self.install_args(chart, values, namespace, release))
    }

    fn upgrade(&self, chart: &Path, namespace: &str, release: &str) -> Result<()> {
        info!(chart = %chart.display(), namespace, release, "upgrading release");
        self.executor
            .run(HELM, self.upgrade_args(chart, namespace, release))
    }

    fn test(&self, namespace: &str, release: &str) -> Result<()> {
        info!(namespace, release, "testing release");
        self.executor
            .run(HELM, ["test", release, "--namespace", namespace])
    }

    fn uninstall(&self, namespace: &str, release: &str) -> Result<()> {
        info!(namespace, release, "uninstalling release");
        self.executor
            .run(HELM, ["uninstall", release, "--namespace", namespace])
    }
}
