#![allow(dead_code)]

use pathwatch::config::{ConfigFile, RawConfigFile, WatchEntry};
use pathwatch::types::NotifierBackendKind;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_request_buffer(mut self, capacity: usize) -> Self {
        self.config.registry.request_buffer = capacity;
        self
    }

    pub fn with_max_concurrent_dispatch(mut self, max: usize) -> Self {
        self.config.registry.max_concurrent_dispatch = Some(max);
        self
    }

    pub fn with_backend(mut self, backend: NotifierBackendKind) -> Self {
        self.config.notifier.backend = backend;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.notifier.poll_interval_ms = ms;
        self
    }

    pub fn watch(mut self, path: &str) -> Self {
        self.config.watch.push(WatchEntry::new(path));
        self
    }

    pub fn watch_labeled(mut self, path: &str, label: &str) -> Self {
        self.config.watch.push(WatchEntry {
            path: path.to_string(),
            label: Some(label.to_string()),
        });
        self
    }

    /// The unvalidated config, for exercising validation failures.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
