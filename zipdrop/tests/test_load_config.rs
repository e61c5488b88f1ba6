use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, NamedTempFile};
use zipdrop::load_config::{load_config, DEFAULT_ENDPOINT, ENDPOINT_ENV};
use zipdrop_core::size_gate::MAX_ARCHIVE_BYTES;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

/// Without a config file the install-relative `comics-zip` / `comics` pair is used.
#[test]
#[serial]
fn test_defaults_without_config_file() {
    env::remove_var(ENDPOINT_ENV);
    let base = PathBuf::from("/opt/zipdrop");

    let config = load_config(None, &[], &base).expect("defaults should load");

    assert_eq!(
        config.batch.source_candidates,
        vec![base.join("comics-zip"), base.join("comics")]
    );
    assert_eq!(config.batch.max_archive_bytes, MAX_ARCHIVE_BYTES);
    assert_eq!(config.upload.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.upload.request_timeout, None);
}

#[test]
#[serial]
fn test_file_values_are_applied() {
    env::remove_var(ENDPOINT_ENV);
    let base = tempdir().unwrap();
    let file = config_file(
        r#"
source_roots:
  - archives/ready
  - /srv/comics
endpoint: "https://files.example/upload"
max_archive_bytes: 1048576
request_timeout_secs: 300
"#,
    );

    let config = load_config(Some(file.path()), &[], base.path()).expect("config should load");

    assert_eq!(
        config.batch.source_candidates,
        vec![base.path().join("archives/ready"), PathBuf::from("/srv/comics")]
    );
    assert_eq!(config.batch.max_archive_bytes, 1_048_576);
    assert_eq!(config.upload.endpoint, "https://files.example/upload");
    assert_eq!(config.upload.request_timeout, Some(Duration::from_secs(300)));
}

#[test]
#[serial]
fn test_source_flags_replace_configured_roots() {
    env::remove_var(ENDPOINT_ENV);
    let file = config_file("source_roots: [configured]\n");
    let overrides = vec![PathBuf::from("relative/flag"), PathBuf::from("/abs/flag")];

    let config = load_config(Some(file.path()), &overrides, &PathBuf::from("/opt/zipdrop"))
        .expect("config should load");

    assert_eq!(config.batch.source_candidates, overrides);
}

#[test]
#[serial]
fn test_env_endpoint_overrides_file() {
    env::set_var(ENDPOINT_ENV, "http://127.0.0.1:9999");
    let file = config_file("endpoint: https://ignored.example\n");

    let config = load_config(Some(file.path()), &[], &PathBuf::from("/opt/zipdrop"));
    env::remove_var(ENDPOINT_ENV);

    assert_eq!(config.unwrap().upload.endpoint, "http://127.0.0.1:9999");
}

#[test]
#[serial]
fn test_empty_file_means_defaults() {
    env::remove_var(ENDPOINT_ENV);
    let file = config_file("");

    let config = load_config(Some(file.path()), &[], &PathBuf::from("/opt/zipdrop"))
        .expect("empty config should load");

    assert_eq!(config.batch.source_candidates.len(), 2);
}

#[test]
#[serial]
fn test_rejects_limit_above_two_gib() {
    env::remove_var(ENDPOINT_ENV);
    let file = config_file(&format!("max_archive_bytes: {}\n", MAX_ARCHIVE_BYTES + 1));

    let err = load_config(Some(file.path()), &[], &PathBuf::from("/opt/zipdrop")).unwrap_err();

    assert!(err.to_string().contains("max_archive_bytes"), "got: {err}");
}

#[test]
#[serial]
fn test_rejects_unknown_keys_and_empty_roots() {
    env::remove_var(ENDPOINT_ENV);
    let unknown = config_file("retries: 3\n");
    assert!(load_config(Some(unknown.path()), &[], &PathBuf::from("/opt")).is_err());

    let empty_roots = config_file("source_roots: []\n");
    assert!(load_config(Some(empty_roots.path()), &[], &PathBuf::from("/opt")).is_err());
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    let err = load_config(
        Some(Path::new("/definitely/not/here.yaml")),
        &[],
        &PathBuf::from("/opt"),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Failed to read config file"));
}
