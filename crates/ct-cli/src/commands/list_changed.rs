use std::path::Path;

use ct_chart::config_search_dirs;
use ct_operations::operations::ChartSelector;
use ct_operations::providers::Git2Provider;

use super::{CommonArgs, load_config, repo_root};
use crate::error::Result;

pub(crate) fn run(config_file: Option<&Path>, args: &CommonArgs) -> Result<()> {
    let repo_root = repo_root()?;
    let config = load_config(config_file, &config_search_dirs(), |config| {
        args.apply(config);
    })?;

    let git = Git2Provider::new();
    let changed = ChartSelector::new(&git, &repo_root, &config).changed()?;

    for dir in changed {
        println!("{}", dir.display());
    }

    Ok(())
}
