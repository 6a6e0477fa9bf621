use std::path::Path;

use ct_core::Chart;

use crate::Result;
use crate::traits::ChartReader;

pub struct FileSystemChartReader;

impl FileSystemChartReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemChartReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartReader for FileSystemChartReader {
    fn read_chart(&self, base: &Path, dir: &Path) -> Result<Chart> {
        Ok(ct_chart::read_chart(base, dir)?)
    }
}
