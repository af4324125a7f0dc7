pub mod build;
pub mod nodes;
pub mod watch;

use clap::{Arg, Command};

/// Flags shared by every command that reads content.
pub fn add_content_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("content")
                .short('s')
                .long("content")
                .value_name("DIR")
                .help("Content root containing the area and page sources"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file")
                .default_value("./cragmap.toml"),
        )
}

/// Flags for commands that write the site.
pub fn add_output_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Theme directory"),
        )
}
