mod args;
mod list_changed;
mod testing;
mod version;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use ct_chart::TestConfig;
use ct_operations::operations::TestMode;
use tracing::debug;

use crate::error::{CliError, Result};

use args::{CommonArgs, InstallArgs, LintArgs};

#[derive(Args)]
pub(crate) struct LintCommand {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    lint: LintArgs,
}

#[derive(Args)]
pub(crate) struct InstallCommand {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Args)]
pub(crate) struct LintAndInstallCommand {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    lint: LintArgs,
    #[command(flatten)]
    install: InstallArgs,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Lint and validate changed charts
    Lint(LintCommand),
    /// Install and test changed charts
    Install(InstallCommand),
    /// Lint, install and test changed charts
    LintAndInstall(LintAndInstallCommand),
    /// List charts changed since the merge base
    ListChanged(CommonArgs),
    /// Print version information
    Version,
}

impl Commands {
    pub(crate) fn execute(self, config_file: Option<&Path>) -> Result<()> {
        match self {
            Self::Lint(cmd) => testing::run(config_file, TestMode::Lint, |config| {
                cmd.common.apply(config);
                cmd.lint.apply(config);
            }),
            Self::Install(cmd) => testing::run(config_file, TestMode::Install, |config| {
                cmd.common.apply(config);
                cmd.install.apply(config);
            }),
            Self::LintAndInstall(cmd) => {
                testing::run(config_file, TestMode::LintAndInstall, |config| {
                    cmd.common.apply(config);
                    cmd.lint.apply(config);
                    cmd.install.apply(config);
                })
            }
            Self::ListChanged(args) => list_changed::run(config_file, &args),
            Self::Version => {
                version::run();
                Ok(())
            }
        }
    }
}

/// The working directory, which is taken to be the repository root.
fn repo_root() -> Result<PathBuf> {
    std::env::current_dir().map_err(CliError::CurrentDir)
}

/// Loads the config file, applies command-line overrides and validates the
/// result.
fn load_config(
    config_file: Option<&Path>,
    search_dirs: &[PathBuf],
    configure: impl FnOnce(&mut TestConfig),
) -> Result<TestConfig> {
    let mut config = TestConfig::load(config_file, search_dirs)?;
    configure(&mut config);
    config.validate()?;
    debug!(?config, "loaded configuration");
    Ok(config)
}
