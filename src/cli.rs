// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pathwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pathwatch",
    version,
    about = "Print create/rename/modify/delete notifications for the given paths.",
    long_about = None
)]
pub struct CliArgs {
    /// Paths to watch, in addition to any `[[watch]]` entries in the config.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// If omitted, `Pathwatch.toml` in the current working directory is used
    /// when it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PATHWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate config and print what would be watched, without watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_paths_and_flags_parse() {
        let args = CliArgs::try_parse_from([
            "pathwatch",
            "Cargo.toml",
            "src/lib.rs",
            "--log-level",
            "debug",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(
            args.paths,
            vec![PathBuf::from("Cargo.toml"), PathBuf::from("src/lib.rs")]
        );
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.dry_run);
        assert!(args.config.is_none());
    }
}
