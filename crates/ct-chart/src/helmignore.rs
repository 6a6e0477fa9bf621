use std::path::{Component, Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::error::ChartError;

/// Name of the per-chart ignore file.
pub const HELMIGNORE: &str = ".helmignore";

#[derive(Debug, Clone)]
struct Rule {
    matcher: GlobMatcher,
    negate: bool,
    dir_only: bool,
    anchored: bool,
}

/// Ignore rules from a chart's `.helmignore`.
///
/// Rules are evaluated in file order and the last matching rule wins. A
/// pattern without a slash matches any path component, a pattern containing
/// a slash matches from the chart root, a trailing slash restricts the rule
/// to directories and a leading `!` re-includes what an earlier rule ignored.
#[derive(Debug, Clone, Default)]
pub struct HelmIgnore {
    rules: Vec<Rule>,
}

impl HelmIgnore {
    /// Loads `.helmignore` from `chart_dir`. A missing file yields no rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds an invalid pattern.
    pub fn load(chart_dir: &Path) -> Result<Self, ChartError> {
        let path = chart_dir.join(HELMIGNORE);
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|source| ChartError::IgnoreFileRead {
                path: path.clone(),
                source,
            })?;

        Self::parse(&content, &path)
    }

    /// # Errors
    ///
    /// Returns [`ChartError::GlobPattern`] if a line is not a valid glob.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ChartError> {
        let mut rules = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (negate, pattern) = match line.strip_prefix('!') {
                Some(rest) => (true, rest),
                None => (false, line),
            };
            let (dir_only, pattern) = match pattern.strip_suffix('/') {
                Some(rest) => (true, rest),
                None => (false, pattern),
            };
            let anchored = pattern.contains('/');
            let pattern = pattern.trim_start_matches('/');
            if pattern.is_empty() {
                continue;
            }

            let matcher = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| ChartError::GlobPattern {
                    path: path.to_path_buf(),
                    pattern: line.to_string(),
                    source,
                })?
                .compile_matcher();

            rules.push(Rule {
                matcher,
                negate,
                dir_only,
                anchored,
            });
        }

        Ok(Self { rules })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path`, relative to the chart directory, is ignored.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        let components: Vec<&std::ffi::OsStr> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        if components.is_empty() {
            return false;
        }

        let mut ignored = false;
        for rule in &self.rules {
            if rule.matches(&components) {
                ignored = !rule.negate;
            }
        }
        ignored
    }
}

impl Rule {
    fn matches(&self, components: &[&std::ffi::OsStr]) -> bool {
        let last = components.len() - 1;

        (0..components.len()).any(|i| {
            // A directory-only rule never matches the file itself.
            if self.dir_only && i == last {
                return false;
            }
            if self.anchored {
                let prefix: PathBuf = components[..=i].iter().collect();
                self.matcher.is_match(prefix)
            } else {
                self.matcher.is_match(components[i])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn rules(content: &str) -> HelmIgnore {
        HelmIgnore::parse(content, Path::new(".helmignore")).expect("valid patterns")
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let ignore = rules("# comment\n\n   \n");

        assert!(ignore.is_empty());
    }

    #[test]
    fn basename_pattern_matches_at_any_depth() {
        let ignore = rules("*.md\n");

        assert!(ignore.is_ignored(Path::new("README.md")));
        assert!(ignore.is_ignored(Path::new("docs/usage.md")));
        assert!(!ignore.is_ignored(Path::new("templates/deployment.yaml")));
    }

    #[test]
    fn directory_pattern_matches_contents_only() {
        let ignore = rules("docs/\n");

        assert!(ignore.is_ignored(Path::new("docs/usage.md")));
        assert!(!ignore.is_ignored(Path::new("docs")));
    }

    #[test]
    fn anchored_pattern_matches_from_root() {
        let ignore = rules("templates/tests/*\n");

        assert!(ignore.is_ignored(Path::new("templates/tests/test-connection.yaml")));
        assert!(!ignore.is_ignored(Path::new("other/templates/tests/x.yaml")));
    }

    #[test]
    fn negation_reincludes_file() {
        let ignore = rules("*.md\n!CHANGELOG.md\n");

        assert!(ignore.is_ignored(Path::new("README.md")));
        assert!(!ignore.is_ignored(Path::new("CHANGELOG.md")));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let result = HelmIgnore::parse("[unclosed\n", Path::new(".helmignore"));

        assert!(matches!(result, Err(ChartError::GlobPattern { .. })));
    }

    #[test]
    fn load_missing_file_yields_no_rules() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let ignore = HelmIgnore::load(dir.path())?;

        assert!(ignore.is_empty());
        assert!(!ignore.is_ignored(Path::new("anything.yaml")));
        Ok(())
    }

    #[test]
    fn load_reads_file_from_chart_dir() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(HELMIGNORE), ".git/\n*.tgz\n")?;

        let ignore = HelmIgnore::load(dir.path())?;

        assert!(ignore.is_ignored(Path::new("foo-1.0.0.tgz")));
        assert!(ignore.is_ignored(Path::new(".git/HEAD")));
        Ok(())
    }
}
