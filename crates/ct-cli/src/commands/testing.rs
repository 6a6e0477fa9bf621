use std::path::Path;

use ct_chart::{LintFiles, TestConfig, config_search_dirs};
use ct_operations::operations::{Collaborators, HelmArgs, TestMode, TestOperation};

use super::{load_config, repo_root};
use crate::error::{CliError, Result};
use crate::output::{PlainTextSummaryFormatter, SummaryFormatter};

pub(crate) fn run(
    config_file: Option<&Path>,
    mode: TestMode,
    configure: impl FnOnce(&mut TestConfig),
) -> Result<()> {
    let repo_root = repo_root()?;
    let search_dirs = config_search_dirs();
    let config = load_config(config_file, &search_dirs, configure)?;

    let lint_files = if mode.lints() {
        config.resolve_lint_files(&search_dirs)?
    } else {
        LintFiles::default()
    };

    let collaborators = Collaborators::system(
        &repo_root,
        &HelmArgs {
            install: &config.helm_extra_args,
            lint: &config.helm_lint_extra_args,
            dependency: &config.helm_dependency_extra_args,
        },
    )?;

    let operation = TestOperation::new(collaborators, repo_root, config, lint_files);
    let results = operation.execute(mode)?;

    print!("{}", PlainTextSummaryFormatter.format(&results));

    if results.overall_success {
        Ok(())
    } else {
        Err(CliError::ChartsFailed {
            failed: results.failures().count(),
            total: results.results.len(),
        })
    }
}
