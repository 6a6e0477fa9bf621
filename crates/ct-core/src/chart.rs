use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// The subset of `Chart.yaml` the test pipeline relies on.
///
/// The version is kept as written; it is only parsed as semver when a
/// comparison actually needs it, so a malformed version surfaces as an
/// error of the check that compares it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartYaml {
    #[serde(default)]
    pub api_version: Option<String>,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub maintainers: Vec<Maintainer>,
}

/// A chart directory together with its parsed descriptor.
///
/// Immutable once read; one value per chart directory per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chart {
    path: PathBuf,
    yaml: ChartYaml,
    ci_values_files: Vec<PathBuf>,
}

impl Chart {
    #[must_use]
    pub fn new(path: PathBuf, yaml: ChartYaml, ci_values_files: Vec<PathBuf>) -> Self {
        Self {
            path,
            yaml,
            ci_values_files,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn yaml(&self) -> &ChartYaml {
        &self.yaml
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.yaml.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.yaml.version
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.yaml.deprecated
    }

    #[must_use]
    pub fn maintainers(&self) -> &[Maintainer] {
        &self.yaml.maintainers
    }

    /// Alternate values files under `ci/`, sorted by path.
    #[must_use]
    pub fn ci_values_files(&self) -> &[PathBuf] {
        &self.ci_values_files
    }

    /// Looks up a CI values file by its file name.
    #[must_use]
    pub fn ci_values_file_named(&self, file_name: &std::ffi::OsStr) -> Option<&Path> {
        self.ci_values_files
            .iter()
            .find(|f| f.file_name() == Some(file_name))
            .map(PathBuf::as_path)
    }

    /// The values files each lint or install run iterates over.
    ///
    /// A chart without CI values files is processed once with its defaults,
    /// represented by a single `None`.
    #[must_use]
    pub fn values_file_runs(&self) -> Vec<Option<&Path>> {
        if self.ci_values_files.is_empty() {
            vec![None]
        } else {
            self.ci_values_files
                .iter()
                .map(|f| Some(f.as_path()))
                .collect()
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => (version: \"{}\", path: \"{}\")",
            self.yaml.name,
            self.yaml.version,
            self.path.display()
        )
    }
}
