mod account_validator;
mod chart_reader;
mod cluster_control;
mod command_runner;
mod git_provider;
mod linters;
mod package_manager;

pub use account_validator::AccountValidator;
pub use chart_reader::ChartReader;
pub use cluster_control::ClusterControl;
pub use command_runner::CommandRunner;
pub use git_provider::GitProvider;
pub use linters::{SchemaValidator, StyleLinter};
pub use package_manager::PackageManager;
