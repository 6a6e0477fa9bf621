use std::path::{Path, PathBuf};

use crate::classify::{lookup_chart_dir, normalize};
use crate::error::ChartError;

/// Lists every chart directly below the configured chart roots.
///
/// Children of each root are visited in sorted order. Directories that are
/// not charts and charts whose name is excluded are left out.
///
/// # Errors
///
/// Returns [`ChartError::ListDir`] if a chart root cannot be read.
pub fn list_chart_dirs(
    base: &Path,
    chart_dirs: &[PathBuf],
    excluded: &[String],
) -> Result<Vec<PathBuf>, ChartError> {
    let mut found = Vec::new();

    for chart_dir in chart_dirs.iter().map(|d| normalize(d)) {
        let root = base.join(&chart_dir);
        let entries = std::fs::read_dir(&root).map_err(|source| ChartError::ListDir {
            path: root.clone(),
            source,
        })?;

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ChartError::ListDir {
                path: root.clone(),
                source,
            })?;
            if entry.path().is_dir() {
                children.push(entry.file_name());
            }
        }
        children.sort();

        for name in children {
            if name
                .to_str()
                .is_some_and(|n| excluded.iter().any(|e| e == n))
            {
                continue;
            }
            let candidate = chart_dir.join(&name);
            let Some(chart) = lookup_chart_dir(base, std::slice::from_ref(&chart_dir), &candidate)
            else {
                continue;
            };
            if !found.contains(&chart) {
                found.push(chart);
            }
        }
    }

    Ok(found)
}
