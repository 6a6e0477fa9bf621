use std::path::Path;
use std::sync::Arc;

use crate::providers::{
    FileSystemChartReader, Git2Provider, Helm, HttpAccountValidator, Kubectl, ProcessExecutor,
    ShellCommandRunner, Yamale, Yamllint,
};
use crate::traits::{
    AccountValidator, ChartReader, ClusterControl, CommandRunner, GitProvider, PackageManager,
    SchemaValidator, StyleLinter,
};
use crate::Result;

/// The external collaborators the pipelines talk to.
#[derive(Clone)]
pub struct Collaborators {
    pub git: Arc<dyn GitProvider>,
    pub charts: Arc<dyn ChartReader>,
    pub package_manager: Arc<dyn PackageManager>,
    pub cluster: Arc<dyn ClusterControl>,
    pub schema_validator: Arc<dyn SchemaValidator>,
    pub style_linter: Arc<dyn StyleLinter>,
    pub account_validator: Arc<dyn AccountValidator>,
    pub command_runner: Arc<dyn CommandRunner>,
}

/// Extra arguments forwarded to Helm.
#[derive(Debug, Clone, Default)]
pub struct HelmArgs<'a> {
    pub install: &'a str,
    pub lint: &'a str,
    pub dependency: &'a str,
}

impl Collaborators {
    /// Wires the real tools, all running from `repo_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client for maintainer checks cannot be built.
    pub fn system(repo_root: &Path, helm_args: &HelmArgs<'_>) -> Result<Self> {
        let executor = ProcessExecutor::new(repo_root);
        let helm = Helm::new(executor.clone())
            .with_extra_args(helm_args.install)
            .with_lint_extra_args(helm_args.lint)
            .with_dependency_extra_args(helm_args.dependency);

        Ok(Self {
            git: Arc::new(Git2Provider::new()),
            charts: Arc::new(FileSystemChartReader::new()),
            package_manager: Arc::new(helm),
            cluster: Arc::new(Kubectl::new(executor.clone())),
            schema_validator: Arc::new(Yamale::new(executor.clone())),
            style_linter: Arc::new(Yamllint::new(executor.clone())),
            account_validator: Arc::new(HttpAccountValidator::new()?),
            command_runner: Arc::new(ShellCommandRunner::new(executor)),
        })
    }
}
