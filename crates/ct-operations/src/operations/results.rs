use ct_core::Chart;

use crate::error::OperationError;

/// Outcome of processing one chart.
#[derive(Debug)]
pub struct TestResult {
    pub chart: Chart,
    pub error: Option<OperationError>,
}

impl TestResult {
    #[must_use]
    pub fn passed(chart: Chart) -> Self {
        Self { chart, error: None }
    }

    #[must_use]
    pub fn failed(chart: Chart, error: OperationError) -> Self {
        Self {
            chart,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn from_outcome(chart: Chart, outcome: crate::Result<()>) -> Self {
        match outcome {
            Ok(()) => Self::passed(chart),
            Err(e) => Self::failed(chart, e),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-chart results of a run with their overall verdict.
#[derive(Debug, Default)]
pub struct TestResults {
    pub overall_success: bool,
    pub results: Vec<TestResult>,
}

impl TestResults {
    /// `overall_success` holds iff no result carries an error. An empty run
    /// succeeds; use [`TestResults::is_empty`] to tell it apart.
    #[must_use]
    pub fn aggregate(results: Vec<TestResult>) -> Self {
        let overall_success = results.iter().all(TestResult::is_success);
        Self {
            overall_success,
            results,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}
