// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod notifier;
pub mod registry;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{resolve_config, ConfigFile};

pub use crate::registry::{
    observer_fn, FnObserver, LoopLifecycle, Observer, RegistryOptions, WatchRegistry,
};
pub use crate::types::ChangeMask;

/// How often the CLI checks whether every watched path has gone away.
const IDLE_CHECK_INTERVAL: Duration = Duration::from_millis(500);

/// One path the CLI subscribes to, with the label printed next to its
/// notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    pub path: PathBuf,
    pub label: String,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the watch registry
/// - one printing observer per watched path
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(args.config.as_deref())?;
    let targets = watch_targets(&cfg, &args.paths);

    if targets.is_empty() {
        bail!("nothing to watch: pass paths on the command line or add [[watch]] entries to the config");
    }

    if args.dry_run {
        print_dry_run(&cfg, &targets);
        return Ok(());
    }

    let registry = WatchRegistry::from_config(&cfg);

    for target in &targets {
        let path = absolute_path(&target.path);
        debug!(?path, label = %target.label, "subscribing");
        registry
            .subscribe(path, printing_observer(target.label.clone()))
            .await?;
    }
    info!(count = targets.len(), "watching paths; press Ctrl-C to stop");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut idle_check = tokio::time::interval(IDLE_CHECK_INTERVAL);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    warn!("failed to listen for Ctrl+C: {e}");
                }
                info!("shutdown requested; unsubscribing");
                for target in &targets {
                    registry.unsubscribe(absolute_path(&target.path)).await;
                }
                return Ok(());
            }
            _ = idle_check.tick() => {
                if !registry.is_running().await {
                    info!("no watched paths remain; exiting");
                    return Ok(());
                }
            }
        }
    }
}

/// Merge `[[watch]]` entries from the config with paths given on the CLI.
///
/// Config entries come first, in file order. Duplicates are kept: each one
/// becomes its own observer.
pub fn watch_targets(cfg: &ConfigFile, cli_paths: &[PathBuf]) -> Vec<WatchTarget> {
    let from_config = cfg.watch.iter().map(|entry| WatchTarget {
        path: PathBuf::from(&entry.path),
        label: entry.effective_label().to_string(),
    });
    let from_cli = cli_paths.iter().map(|path| WatchTarget {
        path: path.clone(),
        label: path.display().to_string(),
    });
    from_config.chain(from_cli).collect()
}

/// Backends report absolute paths, so subscriptions are keyed the same way.
fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn printing_observer(label: String) -> Arc<dyn Observer> {
    observer_fn(move |path, mask| {
        println!("[pathwatch] {label} {} {mask}", path.display());
    })
}

/// Simple dry-run output: print the effective settings and targets.
fn print_dry_run(cfg: &ConfigFile, targets: &[WatchTarget]) {
    println!("pathwatch dry-run");
    println!("  registry.request_buffer = {}", cfg.registry.request_buffer);
    match cfg.registry.max_concurrent_dispatch {
        Some(max) => println!("  registry.max_concurrent_dispatch = {max}"),
        None => println!("  registry.max_concurrent_dispatch = unbounded"),
    }
    println!("  notifier.backend = {:?}", cfg.notifier.backend);
    println!("  notifier.poll_interval_ms = {}", cfg.notifier.poll_interval_ms);
    println!();

    println!("paths ({}):", targets.len());
    for target in targets {
        if target.label == target.path.display().to_string() {
            println!("  - {}", target.path.display());
        } else {
            println!("  - {} ({})", target.path.display(), target.label);
        }
    }

    debug!("dry-run complete (nothing watched)");
}
