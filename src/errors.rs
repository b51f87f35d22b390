// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathwatchError {
    #[error("failed to create file notifier: {0}")]
    NotifierSetup(#[source] notify::Error),

    #[error("watch event loop stopped unexpectedly")]
    LoopStopped,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PathwatchError>;
