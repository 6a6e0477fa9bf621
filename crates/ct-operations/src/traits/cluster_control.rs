use crate::Result;

/// Cluster access for install tests.
///
/// The diagnostic queries (`events`, `pods`, `describe_pod`, `logs`) are only
/// used for failure reporting.
pub trait ClusterControl: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the namespace cannot be created.
    fn create_namespace(&self, namespace: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the namespace cannot be deleted.
    fn delete_namespace(&self, namespace: &str) -> Result<()>;

    /// Blocks until the workloads matching `selector` are rolled out.
    ///
    /// # Errors
    ///
    /// Returns an error if a workload does not become ready.
    fn wait_for_workloads(&self, namespace: &str, selector: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if events cannot be listed.
    fn events(&self, namespace: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if pods cannot be listed.
    fn pods(&self, namespace: &str, selector: &str) -> Result<Vec<String>>;

    /// # Errors
    ///
    /// Returns an error if the pod cannot be described.
    fn describe_pod(&self, namespace: &str, pod: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if logs cannot be fetched.
    fn logs(&self, namespace: &str, pod: &str) -> Result<String>;
}
