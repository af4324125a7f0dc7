use anyhow::Result;
use clap::Command;

mod cmd;
mod config;

fn cli() -> Command {
    Command::new("cragmap")
        .about("Generate a climbing guidebook site from a tree of markdown files")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::nodes::make_subcommand())
        .subcommand(cmd::watch::make_subcommand())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match cli().get_matches().subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("nodes", args)) => cmd::nodes::execute(args),
        Some(("watch", args)) => cmd::watch::execute(args).await,
        _ => unreachable!("subcommand_required is set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_build_flags() {
        let matches = cli()
            .try_get_matches_from(["cragmap", "build", "--content", "data", "-o", "public"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "build");
        assert_eq!(args.get_one::<String>("content").unwrap(), "data");
        assert_eq!(args.get_one::<String>("output").unwrap(), "public");
        assert_eq!(args.get_one::<String>("config").unwrap(), "./cragmap.toml");
    }

    #[test]
    fn test_nodes_pages_flag() {
        let matches = cli()
            .try_get_matches_from(["cragmap", "nodes", "--pages"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(args.get_flag("pages"));
        assert!(args.try_get_one::<String>("output").is_err());
    }
}
