use anyhow::Result;
use clap::{ArgMatches, Command};
use cragmap_core::build_site;
use log::info;
use std::path::Path;

use super::{add_content_args, add_output_args};
use crate::config::CragmapConfig;

pub fn make_subcommand() -> Command {
    add_output_args(add_content_args(Command::new("build")))
        .about("Build static site from area and route markdown files")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let config = CragmapConfig::load(args)?;
    let build_config = config.build_config();

    let content_dir = Path::new(&build_config.content);
    let output_dir = Path::new(&build_config.output);
    let theme_dir = Path::new(&build_config.theme);

    let summary = build_site(&config.core(), content_dir, output_dir, theme_dir)?;

    info!(
        "Site built in {}: {} areas, {} climbs, {} pages",
        output_dir.display(),
        summary.areas,
        summary.climbs,
        summary.pages
    );
    if summary.orphans > 0 {
        info!("{} nodes have no parent area; see warnings above", summary.orphans);
    }

    Ok(())
}
