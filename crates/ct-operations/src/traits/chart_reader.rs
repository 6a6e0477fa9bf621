use std::path::Path;

use ct_core::Chart;

use crate::Result;

pub trait ChartReader: Send + Sync {
    /// Reads the chart at `dir`, resolved against `base`.
    ///
    /// # Errors
    ///
    /// Returns [`ct_chart::ChartError::NotAChart`] (wrapped) if `dir` holds no
    /// `Chart.yaml`, or an error if the descriptor cannot be parsed.
    fn read_chart(&self, base: &Path, dir: &Path) -> Result<Chart>;
}
