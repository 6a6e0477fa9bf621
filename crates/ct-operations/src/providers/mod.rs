mod account;
mod chart;
mod command;
mod git;
mod helm;
mod kubectl;
mod linters;
mod process;

pub use account::{HttpAccountValidator, hosting_domain};
pub use chart::FileSystemChartReader;
pub use command::ShellCommandRunner;
pub use git::Git2Provider;
pub use helm::Helm;
pub use kubectl::Kubectl;
pub use linters::{Yamale, Yamllint};
pub use process::ProcessExecutor;
