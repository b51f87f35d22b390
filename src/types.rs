// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

bitflags::bitflags! {
    /// Kinds of change reported to an observer for a watched path.
    ///
    /// Several flags may be set at once, e.g. when a delete and a re-create
    /// are collapsed into one notification cycle by the backend. The bit
    /// values are fixed and safe to persist or send across a boundary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeMask: u8 {
        const CREATED = 1;
        const RENAMED = 1 << 1;
        const MODIFIED = 1 << 2;
        const DELETED = 1 << 3;
    }
}

impl fmt::Display for ChangeMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("NONE");
        }
        let mut first = true;
        for (name, _) in self.iter_names() {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(name)?;
            first = false;
        }
        Ok(())
    }
}

/// Which `notify` backend the production notifier factory builds.
///
/// - `Recommended`: the platform-native watcher (inotify, FSEvents, ...).
/// - `Poll`: a stat-polling watcher, useful on network file systems where
///   native notifications are unreliable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierBackendKind {
    Recommended,
    Poll,
}

impl Default for NotifierBackendKind {
    fn default() -> Self {
        NotifierBackendKind::Recommended
    }
}

impl FromStr for NotifierBackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recommended" => Ok(NotifierBackendKind::Recommended),
            "poll" => Ok(NotifierBackendKind::Poll),
            other => Err(format!(
                "invalid notifier backend: {other} (expected \"recommended\" or \"poll\")"
            )),
        }
    }
}
