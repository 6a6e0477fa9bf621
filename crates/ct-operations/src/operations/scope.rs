use std::fmt;

use ct_core::Chart;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, info, warn};

use crate::traits::{ClusterControl, PackageManager};

/// Kubernetes object names are limited to 63 characters.
pub const MAX_NAME_LENGTH: usize = 63;

const SUFFIX_LENGTH: usize = 10;

/// Identifiers for one install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallParams {
    pub release: String,
    pub namespace: String,
    /// Whether the namespace was generated for this attempt and must be
    /// created and deleted with it.
    pub owns_namespace: bool,
    /// Label selector matching the release's workloads.
    pub selector: String,
}

impl InstallParams {
    /// Derives release and namespace names for `chart`.
    ///
    /// The release is named after the chart directory. Without a fixed
    /// `namespace`, a namespace is generated from the release and `build_id`.
    /// Both share one random suffix.
    #[must_use]
    pub fn generate(
        chart: &Chart,
        namespace: Option<&str>,
        build_id: &str,
        release_label: &str,
    ) -> Self {
        Self::with_suffix(chart, namespace, build_id, release_label, &random_suffix())
    }

    fn with_suffix(
        chart: &Chart,
        namespace: Option<&str>,
        build_id: &str,
        release_label: &str,
        suffix: &str,
    ) -> Self {
        let base = chart
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| chart.name());

        let (namespace, owns_namespace) = match namespace {
            Some(namespace) => (namespace.to_string(), false),
            None => {
                let mut generated = base.to_string();
                if !build_id.is_empty() {
                    generated = format!("{generated}-{build_id}");
                }
                (
                    sanitize_name(&format!("{generated}-{suffix}"), MAX_NAME_LENGTH),
                    true,
                )
            }
        };

        let release = sanitize_name(&format!("{base}-{suffix}"), MAX_NAME_LENGTH);
        let selector = format!("{release_label}={release}");

        Self {
            release,
            namespace,
            owns_namespace,
            selector,
        }
    }
}

impl fmt::Display for InstallParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "release '{}' in namespace '{}'", self.release, self.namespace)
    }
}

/// Shortens `name` to `max_length` characters by dropping leading excess,
/// then strips leading non-alphanumeric characters.
#[must_use]
pub fn sanitize_name(name: &str, max_length: usize) -> String {
    let excess = name.chars().count().saturating_sub(max_length);
    name.chars()
        .skip(excess)
        .skip_while(|c| !c.is_ascii_alphanumeric())
        .collect()
}

pub(crate) fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Cleanup behaviour applied when an [`InstallScope`] ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupPolicy {
    pub print_logs: bool,
    pub skip_clean_up: bool,
}

/// Owns the cluster resources of one install attempt.
///
/// Cleanup runs exactly once: either through [`InstallScope::close`] or when
/// the scope is dropped on an early return. It collects diagnostics when
/// `print_logs` is set and, unless `skip_clean_up` is set, uninstalls the
/// release and deletes a generated namespace. Cleanup failures are logged.
pub struct InstallScope<'a> {
    package_manager: &'a dyn PackageManager,
    cluster: &'a dyn ClusterControl,
    params: InstallParams,
    policy: CleanupPolicy,
    closed: bool,
}

impl<'a> InstallScope<'a> {
    #[must_use]
    pub fn new(
        package_manager: &'a dyn PackageManager,
        cluster: &'a dyn ClusterControl,
        params: InstallParams,
        policy: CleanupPolicy,
    ) -> Self {
        debug!(release = %params.release, namespace = %params.namespace, "install scope opened");
        Self {
            package_manager,
            cluster,
            params,
            policy,
            closed: false,
        }
    }

    #[must_use]
    pub fn params(&self) -> &InstallParams {
        &self.params
    }

    pub fn close(mut self) {
        self.clean_up();
    }

    fn clean_up(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if self.policy.print_logs {
            self.print_diagnostics();
        }

        if self.policy.skip_clean_up {
            info!(params = %self.params, "skipping clean up");
            return;
        }

        if let Err(e) = self
            .package_manager
            .uninstall(&self.params.namespace, &self.params.release)
        {
            warn!(release = %self.params.release, error = %e, "failed to uninstall release");
        }

        if self.params.owns_namespace {
            if let Err(e) = self.cluster.delete_namespace(&self.params.namespace) {
                warn!(namespace = %self.params.namespace, error = %e, "failed to delete namespace");
            }
        }
    }

    fn print_diagnostics(&self) {
        let namespace = &self.params.namespace;

        match self.cluster.events(namespace) {
            Ok(events) => info!(namespace = %namespace, "events:\n{events}"),
            Err(e) => warn!(namespace = %namespace, error = %e, "failed to collect events"),
        }

        let pods = match self.cluster.pods(namespace, &self.params.selector) {
            Ok(pods) => pods,
            Err(e) => {
                warn!(namespace = %namespace, error = %e, "failed to list pods");
                return;
            }
        };

        for pod in &pods {
            match self.cluster.describe_pod(namespace, pod) {
                Ok(description) => info!(pod = %pod, "description:\n{description}"),
                Err(e) => warn!(pod = %pod, error = %e, "failed to describe pod"),
            }
            match self.cluster.logs(namespace, pod) {
                Ok(logs) => info!(pod = %pod, "logs:\n{logs}"),
                Err(e) => warn!(pod = %pod, error = %e, "failed to fetch logs"),
            }
        }
    }
}

impl Drop for InstallScope<'_> {
    fn drop(&mut self) {
        self.clean_up();
    }
}
