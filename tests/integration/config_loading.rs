// tests/integration/config_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;

use pathwatch::config::{ConfigFile, load_and_validate, resolve_config};
use pathwatch::errors::PathwatchError;
use pathwatch::types::NotifierBackendKind;
use pathwatch::{LoopLifecycle, RegistryOptions, WatchRegistry};
use pathwatch_test_utils::builders::ConfigFileBuilder;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_config_is_loaded() {
    let file = config_file(
        r#"
[registry]
request_buffer = 8
max_concurrent_dispatch = 2

[notifier]
backend = "poll"
poll_interval_ms = 250

[[watch]]
path = "Cargo.toml"
label = "manifest"

[[watch]]
path = "src/lib.rs"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.registry.request_buffer, 8);
    assert_eq!(cfg.registry.max_concurrent_dispatch, Some(2));
    assert_eq!(cfg.notifier.backend, NotifierBackendKind::Poll);
    assert_eq!(cfg.notifier.poll_interval_ms, 250);
    assert_eq!(cfg.watch.len(), 2);
    assert_eq!(cfg.watch[0].effective_label(), "manifest");
    assert_eq!(cfg.watch[1].effective_label(), "src/lib.rs");
}

#[test]
fn empty_file_uses_defaults() {
    let file = config_file("");
    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.registry.request_buffer, 1);
    assert_eq!(cfg.registry.max_concurrent_dispatch, None);
    assert_eq!(cfg.notifier.backend, NotifierBackendKind::Recommended);
    assert_eq!(cfg.notifier.poll_interval_ms, 2000);
    assert!(cfg.watch.is_empty());
}

#[test]
fn zero_request_buffer_returns_config_error() {
    let file = config_file("[registry]\nrequest_buffer = 0\n");

    match load_and_validate(file.path()) {
        Err(PathwatchError::ConfigError(msg)) => assert!(msg.contains("request_buffer")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_dispatch_limit_returns_config_error() {
    let raw = ConfigFileBuilder::new()
        .with_max_concurrent_dispatch(0)
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(PathwatchError::ConfigError(msg)) => {
            assert!(msg.contains("max_concurrent_dispatch"))
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_poll_interval_returns_config_error() {
    let raw = ConfigFileBuilder::new().with_poll_interval_ms(0).build_raw();

    let result = ConfigFile::try_from(raw);
    assert!(matches!(result, Err(PathwatchError::ConfigError(_))));
}

#[test]
fn blank_watch_path_is_rejected_with_its_position() {
    let file = config_file(
        r#"
[[watch]]
path = "ok.txt"

[[watch]]
path = "   "
"#,
    );

    match load_and_validate(file.path()) {
        Err(PathwatchError::ConfigError(msg)) => assert!(msg.contains("#2")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_backend_is_a_toml_error() {
    let file = config_file("[notifier]\nbackend = \"carrier-pigeon\"\n");

    let result = load_and_validate(file.path());
    assert!(matches!(result, Err(PathwatchError::TomlError(_))));
}

#[test]
fn missing_explicit_config_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    let result = resolve_config(Some(missing.as_path()));
    assert!(matches!(result, Err(PathwatchError::IoError(_))));
}

#[tokio::test]
async fn registry_built_from_config_starts_idle() {
    let cfg = ConfigFileBuilder::new()
        .with_request_buffer(4)
        .with_max_concurrent_dispatch(3)
        .with_backend(NotifierBackendKind::Poll)
        .watch_labeled("Cargo.toml", "manifest")
        .build();

    assert_eq!(
        RegistryOptions::from_config(&cfg),
        RegistryOptions {
            request_buffer: 4,
            max_concurrent_dispatch: Some(3),
        }
    );

    let registry = WatchRegistry::from_config(&cfg);
    assert_eq!(registry.lifecycle().await, LoopLifecycle::NotRunning);
    assert_eq!(registry.generations().await, 0);
}
