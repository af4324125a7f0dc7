use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use cragmap_core::load_site;
use std::path::Path;

use super::add_content_args;
use crate::config::CragmapConfig;

pub fn make_subcommand() -> Command {
    add_content_args(Command::new("nodes"))
        .about("Print the ingested nodes or planned pages as JSON")
        .arg(
            Arg::new("pages")
                .long("pages")
                .help("Print page requests instead of nodes")
                .action(clap::ArgAction::SetTrue),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = CragmapConfig::load(args)?;
    let mut pipeline = load_site(&config.core(), Path::new(&config.build_config().content))?;

    let json = if args.get_flag("pages") {
        serde_json::to_string_pretty(&pipeline.plan())?
    } else {
        let nodes: Vec<_> = pipeline.store().nodes().collect();
        serde_json::to_string_pretty(&nodes)?
    };
    println!("{}", json);

    Ok(())
}
