use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ct_chart::ChartError;
use ct_core::{Chart, ChartYaml};

use crate::Result;
use crate::error::OperationError;
use crate::operations::Collaborators;
use crate::traits::{
    AccountValidator, ChartReader, ClusterControl, CommandRunner, GitProvider, PackageManager,
    SchemaValidator, StyleLinter,
};

const PREVIOUS_REVISION_PREFIX: &str = "ct_previous_revision";

fn chart_yaml(name: &str, version: &str, deprecated: bool) -> ChartYaml {
    ChartYaml {
        api_version: Some("v2".to_string()),
        name: name.to_string(),
        version: version.to_string(),
        app_version: None,
        description: None,
        deprecated,
        maintainers: Vec::new(),
    }
}

#[must_use]
pub fn make_chart(path: &str, name: &str, version: &str) -> Chart {
    Chart::new(PathBuf::from(path), chart_yaml(name, version, false), Vec::new())
}

#[must_use]
pub fn make_chart_with_values(path: &str, name: &str, version: &str, values: &[&str]) -> Chart {
    Chart::new(
        PathBuf::from(path),
        chart_yaml(name, version, false),
        values.iter().map(PathBuf::from).collect(),
    )
}

#[must_use]
pub fn make_deprecated_chart(path: &str, name: &str, version: &str) -> Chart {
    Chart::new(PathBuf::from(path), chart_yaml(name, version, true), Vec::new())
}

fn injected_failure(call: &str) -> OperationError {
    OperationError::ProcessFailed {
        command: call.to_string(),
        code: Some(1),
        stderr: "injected failure".to_string(),
    }
}

fn display_opt(path: Option<&Path>) -> String {
    path.map_or_else(|| "-".to_string(), |p| p.display().to_string())
}

pub struct MockGitProvider {
    is_repository: bool,
    merge_base: String,
    changed_files: Vec<PathBuf>,
    files: HashMap<(String, PathBuf), String>,
    remote_url: Option<String>,
    fail_worktree: bool,
    calls: Mutex<Vec<String>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            is_repository: true,
            merge_base: "base".to_string(),
            changed_files: Vec::new(),
            files: HashMap::new(),
            remote_url: None,
            fail_worktree: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn not_a_repository() -> Self {
        Self {
            is_repository: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_merge_base(mut self, revision: &str) -> Self {
        self.merge_base = revision.to_string();
        self
    }

    #[must_use]
    pub fn with_changed_files(mut self, files: &[&str]) -> Self {
        self.changed_files = files.iter().map(PathBuf::from).collect();
        self
    }

    #[must_use]
    pub fn with_file_at(mut self, revision: &str, path: &str, content: &str) -> Self {
        self.files.insert(
            (revision.to_string(), PathBuf::from(path)),
            content.to_string(),
        );
        self
    }

    #[must_use]
    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    #[must_use]
    pub fn failing_worktree(mut self) -> Self {
        self.fail_worktree = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn validate_repository(&self, repo_root: &Path) -> Result<()> {
        if self.is_repository {
            Ok(())
        } else {
            Err(OperationError::NotARepository {
                path: repo_root.to_path_buf(),
            })
        }
    }

    fn merge_base(&self, _repo_root: &Path, left: &str, right: &str) -> Result<String> {
        self.record(format!("merge-base {left} {right}"));
        Ok(self.merge_base.clone())
    }

    fn changed_files_since(
        &self,
        _repo_root: &Path,
        revision: &str,
        dirs: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let dirs: Vec<String> = dirs.iter().map(|d| d.display().to_string()).collect();
        self.record(format!("diff {revision} {}", dirs.join(" ")));
        Ok(self.changed_files.clone())
    }

    fn file_exists_at_revision(
        &self,
        _repo_root: &Path,
        revision: &str,
        path: &Path,
    ) -> Result<bool> {
        Ok(self
            .files
            .contains_key(&(revision.to_string(), path.to_path_buf())))
    }

    fn read_file_at_revision(
        &self,
        _repo_root: &Path,
        revision: &str,
        path: &Path,
    ) -> Result<String> {
        self.files
            .get(&(revision.to_string(), path.to_path_buf()))
            .cloned()
            .ok_or_else(|| {
                ct_git::GitError::FileNotFound {
                    path: path.to_path_buf(),
                    revision: revision.to_string(),
                }
                .into()
            })
    }

    fn remote_url(&self, _repo_root: &Path, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }

    fn add_worktree(&self, _repo_root: &Path, path: &Path, revision: &str) -> Result<()> {
        self.record(format!("worktree add {} {revision}", path.display()));
        if self.fail_worktree {
            return Err(ct_git::GitError::InvalidWorktreePath {
                path: path.to_path_buf(),
            }
            .into());
        }
        Ok(())
    }

    fn remove_worktree(&self, _repo_root: &Path, path: &Path) -> Result<()> {
        self.record(format!("worktree remove {}", path.display()));
        Ok(())
    }
}

/// Serves charts from memory.
///
/// Charts registered with [`MockChartReader::with_previous_chart`] are
/// returned for any base that looks like a previous-revision worktree.
pub struct MockChartReader {
    charts: HashMap<(PathBuf, PathBuf), Chart>,
    previous: HashMap<PathBuf, Chart>,
}

impl MockChartReader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            charts: HashMap::new(),
            previous: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_chart(mut self, base: &str, chart: Chart) -> Self {
        self.charts
            .insert((PathBuf::from(base), chart.path().to_path_buf()), chart);
        self
    }

    #[must_use]
    pub fn with_previous_chart(mut self, chart: Chart) -> Self {
        self.previous.insert(chart.path().to_path_buf(), chart);
        self
    }
}

impl Default for MockChartReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartReader for MockChartReader {
    fn read_chart(&self, base: &Path, dir: &Path) -> Result<Chart> {
        if let Some(chart) = self.charts.get(&(base.to_path_buf(), dir.to_path_buf())) {
            return Ok(chart.clone());
        }

        let is_previous = base
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(PREVIOUS_REVISION_PREFIX));
        if is_previous {
            if let Some(chart) = self.previous.get(dir) {
                return Ok(chart.clone());
            }
        }

        Err(ChartError::NotAChart {
            path: dir.to_path_buf(),
        }
        .into())
    }
}

/// Records every Helm, kubectl, linter, account and shell call in one
/// ordered log. Calls starting with a configured prefix fail.
pub struct MockToolchain {
    helm_version: String,
    pods: Vec<String>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockToolchain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            helm_version: "v3.14.0".to_string(),
            pods: Vec::new(),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_helm_version(mut self, version: &str) -> Self {
        self.helm_version = version.to_string();
        self
    }

    #[must_use]
    pub fn with_pods(mut self, pods: &[&str]) -> Self {
        self.pods = pods.iter().map(|p| (*p).to_string()).collect();
        self
    }

    #[must_use]
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.failing.push(prefix.to_string());
        self
    }

    /// Collaborators backed by this toolchain, `git` and an empty chart reader.
    #[must_use]
    pub fn collaborators(self: &Arc<Self>, git: Arc<dyn GitProvider>) -> Collaborators {
        Collaborators {
            git,
            charts: Arc::new(MockChartReader::new()),
            package_manager: self.clone(),
            cluster: self.clone(),
            schema_validator: self.clone(),
            style_linter: self.clone(),
            account_validator: self.clone(),
            command_runner: self.clone(),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    #[must_use]
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) -> Result<()> {
        let fails = self.failing.iter().any(|prefix| call.starts_with(prefix));
        self.calls.lock().expect("lock poisoned").push(call.clone());
        if fails {
            Err(injected_failure(&call))
        } else {
            Ok(())
        }
    }
}

impl Default for MockToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for MockToolchain {
    fn version(&self) -> Result<String> {
        self.record("version".to_string())?;
        Ok(self.helm_version.clone())
    }

    fn add_repository(&self, name: &str, url: &str, extra_args: &[String]) -> Result<()> {
        let mut call = format!("repo add {name} {url}");
        for arg in extra_args {
            call.push(' ');
            call.push_str(arg);
        }
        self.record(call)
    }

    fn build_dependencies(&self, chart: &Path) -> Result<()> {
        self.record(format!("dependency build {}", chart.display()))
    }

    fn lint(&self, chart: &Path, values: Option<&Path>) -> Result<()> {
        self.record(format!("lint {} {}", chart.display(), display_opt(values)))
    }

    fn install(
        &self,
        chart: &Path,
        values: Option<&Path>,
        namespace: &str,
        release: &str,
    ) -> Result<()> {
        self.record(format!(
            "install {} {} {namespace} {release}",
            chart.display(),
            display_opt(values)
        ))
    }

    fn upgrade(&self, chart: &Path, namespace: &str, release: &str) -> Result<()> {
        self.record(format!("upgrade {} {namespace} {release}", chart.display()))
    }

    fn test(&self, namespace: &str, release: &str) -> Result<()> {
        self.record(format!("test {namespace} {release}"))
    }

    fn uninstall(&self, namespace: &str, release: &str) -> Result<()> {
        self.record(format!("uninstall {namespace} {release}"))
    }
}

impl ClusterControl for MockToolchain {
    fn create_namespace(&self, namespace: &str) -> Result<()> {
        self.record(format!("create namespace {namespace}"))
    }

    fn delete_namespace(&self, namespace: &str) -> Result<()> {
        self.record(format!("delete namespace {namespace}"))
    }

    fn wait_for_workloads(&self, namespace: &str, selector: &str) -> Result<()> {
        self.record(format!("wait {namespace} {selector}"))
    }

    fn events(&self, namespace: &str) -> Result<String> {
        self.record(format!("events {namespace}"))?;
        Ok(String::new())
    }

    fn pods(&self, namespace: &str, selector: &str) -> Result<Vec<String>> {
        self.record(format!("pods {namespace} {selector}"))?;
        Ok(self.pods.clone())
    }

    fn describe_pod(&self, namespace: &str, pod: &str) -> Result<String> {
        self.record(format!("describe {namespace} {pod}"))?;
        Ok(String::new())
    }

    fn logs(&self, namespace: &str, pod: &str) -> Result<String> {
        self.record(format!("logs {namespace} {pod}"))?;
        Ok(String::new())
    }
}

impl SchemaValidator for MockToolchain {
    fn validate_schema(&self, file: &Path, _schema: &Path) -> Result<()> {
        self.record(format!("schema {}", file.display()))
    }
}

impl StyleLinter for MockToolchain {
    fn lint_style(&self, file: &Path, _config: &Path) -> Result<()> {
        self.record(format!("yamllint {}", file.display()))
    }
}

impl AccountValidator for MockToolchain {
    fn validate(&self, domain: &str, account: &str) -> Result<()> {
        self.record(format!("account {domain} {account}"))
    }
}

impl CommandRunner for MockToolchain {
    fn run(&self, command: &str) -> Result<()> {
        self.record(format!("sh {command}"))
    }
}
