mod classify;
mod config;
mod descriptor;
mod discovery;
mod error;
mod helmignore;

pub use classify::{ChangedCharts, classify_changed_files, lookup_chart_dir};
pub use config::{
    CONFIG_FILE_NAMES, ChartRepo, LINT_CONF_FILE, LintFiles, SCHEMA_FILE, TestConfig,
    config_search_dirs, locate_file,
};
pub use descriptor::{parse_chart_yaml, read_chart, read_chart_yaml};
pub use discovery::list_chart_dirs;
pub use error::{ChartError, ConfigError};
pub use helmignore::{HELMIGNORE, HelmIgnore};

pub type Result<T> = std::result::Result<T, ChartError>;
