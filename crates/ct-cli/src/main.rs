mod commands;
mod error;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::commands::Commands;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "ct")]
#[command(bin_name = "ct")]
#[command(about = "Lint and test Helm charts", long_about = None)]
struct Cli {
    /// Config file (default: first ct.yaml, ct.yml, ct.toml or ct.json in ., ~/.ct, /etc/ct)
    #[arg(long, global = true, env = "CT_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless CT_LOG says otherwise
    #[arg(long, global = true, env = "CT_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(e) = cli.command.execute(cli.config.as_deref()) {
        print_error(&e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn print_error(error: &CliError) {
    eprintln!("error: {error}");

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("caused by: {cause}");
        source = std::error::Error::source(cause);
    }
}
