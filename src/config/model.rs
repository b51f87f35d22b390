// src/config/model.rs

use serde::Deserialize;

use crate::types::NotifierBackendKind;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [registry]
/// request_buffer = 1
/// max_concurrent_dispatch = 8
///
/// [notifier]
/// backend = "recommended"
///
/// [[watch]]
/// path = "Cargo.toml"
/// label = "manifest"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub registry: RegistrySection,

    #[serde(default)]
    pub notifier: NotifierSection,

    #[serde(default)]
    pub watch: Vec<WatchEntry>,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub registry: RegistrySection,
    pub notifier: NotifierSection,
    pub watch: Vec<WatchEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        registry: RegistrySection,
        notifier: NotifierSection,
        watch: Vec<WatchEntry>,
    ) -> Self {
        Self {
            registry,
            notifier,
            watch,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(
            RegistrySection::default(),
            NotifierSection::default(),
            Vec::new(),
        )
    }
}

/// `[registry]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySection {
    /// Capacity of each request queue into the event loop.
    ///
    /// Callers wait for the loop to take their request either way; this
    /// only bounds how many can be queued at once.
    #[serde(default = "default_request_buffer")]
    pub request_buffer: usize,

    /// Upper bound on observer notifications running at the same time.
    ///
    /// `None` means unbounded: every notification gets its own task.
    #[serde(default)]
    pub max_concurrent_dispatch: Option<usize>,
}

fn default_request_buffer() -> usize {
    1
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            request_buffer: default_request_buffer(),
            max_concurrent_dispatch: None,
        }
    }
}

/// `[notifier]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSection {
    #[serde(default)]
    pub backend: NotifierBackendKind,

    /// Only used by the `poll` backend.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for NotifierSection {
    fn default() -> Self {
        Self {
            backend: NotifierBackendKind::default(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// One `[[watch]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchEntry {
    pub path: String,

    /// Name printed alongside notifications; defaults to the path.
    #[serde(default)]
    pub label: Option<String>,
}

impl WatchEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: None,
        }
    }

    pub fn effective_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.path)
    }
}
