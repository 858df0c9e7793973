use depmap::config::DEFAULT_EXTENSIONS;
use depmap::{MapperConfig, MapperError};
use std::fs;
use std::time::Duration;

#[test]
fn defaults_match_the_analyzable_set() {
    let config = MapperConfig::default();
    assert_eq!(config.extensions, DEFAULT_EXTENSIONS.to_vec());
    assert_eq!(config.ignored_dirs, vec!["node_modules"]);
    assert!(config.skip_hidden_dirs);
    assert!(config.parallel);
    assert_eq!(config.time_budget(), None);
    assert!(config.is_skipped_dir(".git"));
    assert!(config.is_skipped_dir("node_modules"));
    assert!(!config.is_skipped_dir("src"));
    assert!(config.is_analyzable_extension("TSX"));
    assert!(!config.is_analyzable_extension("json"));
}

#[test]
fn from_file_fills_missing_keys_and_normalizes() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("depmap.json");
    fs::write(
        &path,
        r#"{ "extensions": [".TS", "js", "ts", ""], "ignoredDirs": ["dist", " "], "timeBudgetMs": 250 }"#,
    )
    .unwrap();

    let config = MapperConfig::from_file(&path).unwrap();
    assert_eq!(config.extensions, vec!["ts", "js"]);
    assert_eq!(config.ignored_dirs, vec!["dist"]);
    assert!(config.skip_hidden_dirs);
    assert_eq!(config.time_budget(), Some(Duration::from_millis(250)));
}

#[test]
fn empty_extension_list_is_rejected() {
    let err = MapperConfig::default()
        .with_extensions(Vec::<String>::new())
        .normalized()
        .unwrap_err();
    assert!(matches!(err, MapperError::Config(_)));
}

#[test]
fn extensions_with_separators_are_rejected() {
    let err = MapperConfig::default()
        .with_extensions(["js", "d/ts"])
        .normalized()
        .unwrap_err();
    assert!(matches!(err, MapperError::Config(_)));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let err = MapperConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, MapperError::Io { .. }));
}

#[test]
fn builder_strips_leading_dots() {
    let config = MapperConfig::new().with_extensions([".Vue", "svelte"]);
    assert_eq!(config.extensions, vec!["vue", "svelte"]);
}
