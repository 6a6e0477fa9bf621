use std::path::{Path, PathBuf};

use ct_core::{CHART_YAML, CI_VALUES_DIR, Chart, ChartYaml};

use crate::error::ChartError;

const CI_VALUES_SUFFIX: &str = "-values.yaml";

/// Parses `Chart.yaml` content. `path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`ChartError::DescriptorParse`] if the content is not a valid descriptor.
pub fn parse_chart_yaml(content: &str, path: &Path) -> Result<ChartYaml, ChartError> {
    serde_yml::from_str(content).map_err(|source| ChartError::DescriptorParse {
        path: path.to_path_buf(),
        source,
    })
}

/// # Errors
///
/// Returns [`ChartError::DescriptorRead`] or [`ChartError::DescriptorParse`].
pub fn read_chart_yaml(path: &Path) -> Result<ChartYaml, ChartError> {
    let content = std::fs::read_to_string(path).map_err(|source| ChartError::DescriptorRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_chart_yaml(&content, path)
}

/// Reads the chart at `dir`, resolved against `base`.
///
/// The returned chart keeps `dir` as given, so relative chart paths stay
/// relative to `base`.
///
/// # Errors
///
/// Returns [`ChartError::NotAChart`] if `dir` has no `Chart.yaml`, or an error
/// if the descriptor or the `ci/` directory cannot be read.
pub fn read_chart(base: &Path, dir: &Path) -> Result<Chart, ChartError> {
    let chart_yaml_path = base.join(dir).join(CHART_YAML);
    if !chart_yaml_path.is_file() {
        return Err(ChartError::NotAChart {
            path: dir.to_path_buf(),
        });
    }

    let yaml = read_chart_yaml(&chart_yaml_path)?;
    let ci_values_files = find_ci_values_files(base, dir)?;

    Ok(Chart::new(dir.to_path_buf(), yaml, ci_values_files))
}

fn find_ci_values_files(base: &Path, dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let ci_dir = base.join(dir).join(CI_VALUES_DIR);
    if !ci_dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&ci_dir).map_err(|source| ChartError::ListDir {
        path: ci_dir.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ChartError::ListDir {
            path: ci_dir.clone(),
            source,
        })?;
        let file_name = entry.file_name();
        let is_values_file = file_name
            .to_str()
            .is_some_and(|name| name.ends_with(CI_VALUES_SUFFIX));
        if is_values_file && entry.path().is_file() {
            files.push(dir.join(CI_VALUES_DIR).join(file_name));
        }
    }
    files.sort();

    Ok(files)
}
