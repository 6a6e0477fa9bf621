use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use ct_core::CHART_YAML;

use crate::error::ChartError;
use crate::helmignore::HelmIgnore;

/// Result of mapping changed files to chart directories.
///
/// This is a data transfer object with intentionally public fields for direct access.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangedCharts {
    /// Distinct chart directories, in order of first occurrence.
    pub chart_dirs: Vec<PathBuf>,
    /// Directories of changed files that do not belong to any chart.
    pub unresolved_dirs: Vec<PathBuf>,
    /// Changed files matched by their chart's `.helmignore`.
    pub ignored_files: Vec<PathBuf>,
}

/// Drops `.` components so that `./charts` and `charts` compare equal.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Finds the chart directory `dir` belongs to.
///
/// Walks upwards from `dir` looking for a directory that holds a `Chart.yaml`
/// and is a direct child of one of `chart_dirs`. Nested sub-charts are
/// therefore attributed to their top-level chart. Chart roots are tried in
/// configured order and the first hit wins.
#[must_use]
pub fn lookup_chart_dir(base: &Path, chart_dirs: &[PathBuf], dir: &Path) -> Option<PathBuf> {
    for chart_dir in chart_dirs.iter().map(|d| normalize(d)) {
        let mut current = normalize(dir);

        loop {
            let parent = current.parent().map(Path::to_path_buf).unwrap_or_default();
            if parent == chart_dir && base.join(&current).join(CHART_YAML).is_file() {
                return Some(current);
            }
            if current.as_os_str().is_empty() {
                break;
            }

            current = parent;
            if current == chart_dir || !current.starts_with(&chart_dir) {
                break;
            }
        }
    }

    None
}

/// Maps changed files to the distinct chart directories they belong to.
///
/// Files with fewer than two path segments, files whose second segment names
/// an excluded chart, and files resolving to an excluded chart are skipped.
/// Files outside any chart are collected in
/// [`ChangedCharts::unresolved_dirs`] rather than treated as errors. With
/// `use_helmignore`, files ignored by their chart's `.helmignore` do not mark
/// the chart as changed.
///
/// # Errors
///
/// Returns an error only if a `.helmignore` file cannot be read or parsed.
pub fn classify_changed_files(
    base: &Path,
    changed_files: &[PathBuf],
    chart_dirs: &[PathBuf],
    excluded: &[String],
    use_helmignore: bool,
) -> Result<ChangedCharts, ChartError> {
    let mut changed = ChangedCharts::default();
    let mut ignore_rules: HashMap<PathBuf, HelmIgnore> = HashMap::new();

    for file in changed_files {
        let file = normalize(file);
        let segments: Vec<&str> = file
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        if segments.len() < 2 || is_excluded(excluded, segments[1]) {
            continue;
        }

        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        let Some(chart_dir) = lookup_chart_dir(base, chart_dirs, &dir) else {
            if !changed.unresolved_dirs.contains(&dir) {
                changed.unresolved_dirs.push(dir);
            }
            continue;
        };

        let chart_name = chart_dir.file_name().and_then(|n| n.to_str());
        if chart_name.is_some_and(|name| is_excluded(excluded, name)) {
            continue;
        }

        if use_helmignore {
            if !ignore_rules.contains_key(&chart_dir) {
                let rules = HelmIgnore::load(&base.join(&chart_dir))?;
                ignore_rules.insert(chart_dir.clone(), rules);
            }
            let relative = file.strip_prefix(&chart_dir).unwrap_or(&file);
            if ignore_rules
                .get(&chart_dir)
                .is_some_and(|rules| rules.is_ignored(relative))
            {
                changed.ignored_files.push(file.clone());
                continue;
            }
        }

        if !changed.chart_dirs.contains(&chart_dir) {
            changed.chart_dirs.push(chart_dir);
        }
    }

    Ok(changed)
}

fn is_excluded(excluded: &[String], name: &str) -> bool {
    excluded.iter().any(|e| e == name)
}
