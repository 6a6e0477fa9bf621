use std::path::{Path, PathBuf};

use ct_chart::{
    ChartError, ConfigError, TestConfig, classify_changed_files, list_chart_dirs, read_chart,
};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn repo() -> PathBuf {
    fixtures_dir().join("repo")
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

fn roots() -> Vec<PathBuf> {
    paths(&["charts", "incubator"])
}

#[test]
fn lists_charts_across_roots_in_order() {
    let dirs = list_chart_dirs(&repo(), &roots(), &[]).expect("list charts");

    assert_eq!(
        dirs,
        paths(&["charts/nginx", "charts/redis", "incubator/kafka"])
    );
}

#[test]
fn listing_skips_excluded_charts() {
    let dirs = list_chart_dirs(&repo(), &roots(), &["redis".to_string()]).expect("list charts");

    assert_eq!(dirs, paths(&["charts/nginx", "incubator/kafka"]));
}

#[test]
fn missing_chart_root_is_an_error() {
    let result = list_chart_dirs(&repo(), &paths(&["stable"]), &[]);

    assert!(matches!(result, Err(ChartError::ListDir { .. })));
}

#[test]
fn reads_descriptor_and_sorted_ci_values_files() {
    let chart = read_chart(&repo(), Path::new("charts/nginx")).expect("read chart");

    assert_eq!(chart.name(), "nginx");
    assert_eq!(chart.version(), "1.4.0");
    assert_eq!(chart.yaml().app_version.as_deref(), Some("1.25.3"));
    assert_eq!(chart.maintainers().len(), 1);
    assert_eq!(chart.maintainers()[0].name, "alice");
    assert_eq!(
        chart.ci_values_files(),
        paths(&[
            "charts/nginx/ci/default-values.yaml",
            "charts/nginx/ci/ha-values.yaml"
        ])
        .as_slice()
    );
}

#[test]
fn reads_deprecated_chart() {
    let chart = read_chart(&repo(), Path::new("charts/redis")).expect("read chart");

    assert!(chart.is_deprecated());
    assert!(chart.maintainers().is_empty());
    assert_eq!(chart.values_file_runs(), vec![None]);
}

#[test]
fn directory_without_descriptor_is_not_a_chart() {
    let result = read_chart(&repo(), Path::new("charts/notes"));

    assert!(matches!(result, Err(ChartError::NotAChart { .. })));
}

#[test]
fn changes_map_to_their_charts() {
    let changed = paths(&[
        "charts/nginx/templates/deployment.yaml",
        "charts/nginx/charts/sidecar/Chart.yaml",
        "incubator/kafka/Chart.yaml",
        "charts/notes/README.txt",
        "README.md",
    ]);

    let result =
        classify_changed_files(&repo(), &changed, &roots(), &[], true).expect("classify changes");

    assert_eq!(result.chart_dirs, paths(&["charts/nginx", "incubator/kafka"]));
    assert_eq!(result.unresolved_dirs, paths(&["charts/notes"]));
}

#[test]
fn helmignored_changes_are_not_chart_changes() {
    let changed = paths(&[
        "charts/nginx/README.md",
        "charts/nginx/docs/usage.txt",
    ]);

    let result =
        classify_changed_files(&repo(), &changed, &roots(), &[], true).expect("classify changes");

    assert!(result.chart_dirs.is_empty());
    assert_eq!(result.ignored_files, changed);
}

#[test]
fn helmignore_is_skipped_when_disabled() {
    let changed = paths(&["charts/nginx/README.md"]);

    let result =
        classify_changed_files(&repo(), &changed, &roots(), &[], false).expect("classify changes");

    assert_eq!(result.chart_dirs, paths(&["charts/nginx"]));
    assert!(result.ignored_files.is_empty());
}

#[test]
fn excluded_charts_are_not_classified() {
    let changed = paths(&["charts/redis/Chart.yaml", "incubator/kafka/Chart.yaml"]);

    let result = classify_changed_files(&repo(), &changed, &roots(), &["redis".to_string()], true)
        .expect("classify changes");

    assert_eq!(result.chart_dirs, paths(&["incubator/kafka"]));
}

fn assert_fixture_config(config: &TestConfig) {
    assert_eq!(config.remote, "upstream");
    assert_eq!(config.target_branch, "main");
    assert_eq!(config.chart_dirs, roots());
    assert_eq!(config.excluded_charts, vec!["redis".to_string()]);
    assert_eq!(config.helm_extra_args, "--timeout 600s");
    assert!(!config.validate_maintainers);
    assert!(config.validate_yaml);
    assert_eq!(config.since, "HEAD");
}

#[test]
fn loads_config_in_every_format() {
    for name in ["ct.yaml", "ct.toml", "ct.json"] {
        let config =
            TestConfig::from_file(&fixtures_dir().join("config").join(name)).expect("load config");

        assert_fixture_config(&config);
        config.validate().expect("valid config");
    }
}

#[test]
fn search_picks_first_config_file_name() {
    let config = TestConfig::load(None, &[fixtures_dir().join("config")]).expect("load config");

    assert_fixture_config(&config);
    let repos = config.parsed_chart_repos().expect("parse repos");
    assert_eq!(repos.len(), 1);
    assert_eq!(repos[0].name, "bitnami");
    assert_eq!(repos[0].url, "https://charts.bitnami.com/bitnami");
}

#[test]
fn search_without_config_file_uses_defaults() {
    let config = TestConfig::load(None, &[repo()]).expect("load config");

    assert_eq!(config, TestConfig::default());
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let result = TestConfig::load(Some(&fixtures_dir().join("config/absent.yaml")), &[]);

    assert!(matches!(result, Err(ConfigError::Read { .. })));
}
