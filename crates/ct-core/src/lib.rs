mod chart;

pub use chart::{Chart, ChartYaml, Maintainer};

/// File name of the chart descriptor inside a chart directory.
pub const CHART_YAML: &str = "Chart.yaml";

/// File name of the default values file inside a chart directory.
pub const VALUES_YAML: &str = "values.yaml";

/// Directory inside a chart holding the alternate values files used in CI.
pub const CI_VALUES_DIR: &str = "ci";
