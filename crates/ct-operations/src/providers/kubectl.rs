use tracing::{debug, info};

use super::process::ProcessExecutor;
use crate::Result;
use crate::traits::ClusterControl;

const KUBECTL: &str = "kubectl";
const ROLLOUT_TIMEOUT: &str = "300s";
const DELETE_TIMEOUT: &str = "120s";

/// [`ClusterControl`] backed by the `kubectl` binary.
#[derive(Debug, Clone)]
pub struct Kubectl {
    executor: ProcessExecutor,
}

impl Kubectl {
    #[must_use]
    pub fn new(executor: ProcessExecutor) -> Self {
        Self { executor }
    }
}

impl ClusterControl for Kubectl {
    fn create_namespace(&self, namespace: &str) -> Result<()> {
        info!(namespace, "creating namespace");
        self.executor.run(KUBECTL, ["create", "namespace", namespace])
    }

    fn delete_namespace(&self, namespace: &str) -> Result<()> {
        info!(namespace, "deleting namespace");
        self.executor.run(
            KUBECTL,
            ["delete", "namespace", namespace, "--timeout", DELETE_TIMEOUT],
        )
    }

    fn wait_for_workloads(&self, namespace: &str, selector: &str) -> Result<()> {
        let workloads = self.executor.output(
            KUBECTL,
            [
                "get",
                "deployments,statefulsets,daemonsets",
                "--namespace",
                namespace,
                "--selector",
                selector,
                "--output",
                "name",
            ],
        )?;

        for workload in workloads.lines().map(str::trim).filter(|l| !l.is_empty()) {
            debug!(namespace, workload, "waiting for rollout");
            self.executor.run(
                KUBECTL,
                [
                    "rollout",
                    "status",
                    workload,
                    "--namespace",
                    namespace,
                    "--timeout",
                    ROLLOUT_TIMEOUT,
                ],
            )?;
        }
        Ok(())
    }

    fn events(&self, namespace: &str) -> Result<String> {
        self.executor.output(
            KUBECTL,
            ["get", "events", "--output", "wide", "--namespace", namespace],
        )
    }

    fn pods(&self, namespace: &str, selector: &str) -> Result<Vec<String>> {
        let names = self.executor.output(
            KUBECTL,
            [
                "get",
                "pods",
                "--namespace",
                namespace,
                "--selector",
                selector,
                "--output",
                "jsonpath={.items[*].metadata.name}",
            ],
        )?;
        Ok(names.split_whitespace().map(str::to_string).collect())
    }

    fn describe_pod(&self, namespace: &str, pod: &str) -> Result<String> {
        self.executor
            .output(KUBECTL, ["describe", "pod", pod, "--namespace", namespace])
    }

    fn logs(&self, namespace: &str, pod: &str) -> Result<String> {
        self.executor.output(
            KUBECTL,
            ["logs", pod, "--namespace", namespace, "--all-containers"],
        )
    }
}
