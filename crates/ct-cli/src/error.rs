use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid configuration")]
    Config(#[from] ct_chart::ConfigError),

    #[error("chart testing failed")]
    Operation(#[from] ct_operations::OperationError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("{failed} of {total} chart(s) failed")]
    ChartsFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, CliError>;
