use anyhow::Result;
use clap::{ArgMatches, Command};
use cragmap_core::build_site;
use log::{debug, error, info};
use notify::Watcher;
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::{path::PathBuf, time::Duration};

use super::{add_content_args, add_output_args};
use crate::config::CragmapConfig;

pub fn make_subcommand() -> Command {
    add_output_args(add_content_args(Command::new("watch")))
        .about("Rebuild the site whenever content, theme or config changes")
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let config = CragmapConfig::load(args)?;
    rebuild(&config);
    watch_source_files(args, config).await
}

fn rebuild(config: &CragmapConfig) {
    let build_config = config.build_config();
    match build_site(
        &config.core(),
        &PathBuf::from(&build_config.content),
        &PathBuf::from(&build_config.output),
        &PathBuf::from(&build_config.theme),
    ) {
        Ok(summary) => info!(
            "Site rebuilt: {} areas, {} climbs, {} pages",
            summary.areas, summary.climbs, summary.pages
        ),
        Err(e) => error!("Build error: {}", e),
    }
}

async fn watch_source_files(args: &ArgMatches, config: CragmapConfig) -> Result<()> {
    let build_config = config.build_config();
    let content_dir = PathBuf::from(&build_config.content);
    let theme_dir = PathBuf::from(&build_config.theme);
    let config_file = PathBuf::from(&build_config.config);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    let _ = tx.blocking_send(event.path);
                }
            }
        },
    )?;

    debouncer
        .watcher()
        .watch(&content_dir, notify::RecursiveMode::Recursive)?;
    info!("Watching content directory: {}", content_dir.display());

    if theme_dir.exists() {
        debouncer
            .watcher()
            .watch(&theme_dir, notify::RecursiveMode::Recursive)?;
        info!("Watching theme directory: {}", theme_dir.display());
    }

    if config_file.exists() {
        debouncer
            .watcher()
            .watch(&config_file, notify::RecursiveMode::NonRecursive)?;
        info!("Watching config file: {}", config_file.display());
    }

    let mut config = config;
    while let Some(path) = rx.recv().await {
        // Drain whatever else arrived in the same burst.
        while rx.try_recv().is_ok() {}
        debug!("change in {}", path.display());

        let abs_path = path.canonicalize().unwrap_or(path.clone());
        if abs_path == config_file.canonicalize().unwrap_or(config_file.clone()) {
            match CragmapConfig::load(args) {
                Ok(reloaded) => config = reloaded,
                Err(e) => error!("Config error, keeping previous config: {}", e),
            }
        }

        rebuild(&config);
    }

    Ok(())
}
