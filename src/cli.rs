use std::path::PathBuf;

use clap::Parser;

/// Mason - incremental asset build orchestrator
#[derive(Parser, Debug)]
#[command(name = "mason")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Source asset directory (holds builder.settings)
    #[arg(short, long, default_value = "Content")]
    pub source: PathBuf,

    /// Output directory for compiled assets
    #[arg(short, long, default_value = "Binaries/Content")]
    pub target: PathBuf,

    /// Keep running, watch the source tree and accept console commands
    #[arg(long)]
    pub server: bool,

    /// Make the initial rebuild a full rebuild
    #[arg(short, long)]
    pub force: bool,

    /// Initial setting profile
    #[arg(short, long, env = "MASON_PROFILE")]
    pub profile: Option<String>,

    /// Print build events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["mason"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("Content"));
        assert_eq!(cli.target, PathBuf::from("Binaries/Content"));
        assert!(!cli.server);
        assert!(!cli.force);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parse_server_with_args() {
        let cli = Cli::try_parse_from([
            "mason",
            "--source",
            "assets",
            "--target",
            "out",
            "--server",
            "--force",
            "--profile",
            "release",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.source, PathBuf::from("assets"));
        assert_eq!(cli.target, PathBuf::from("out"));
        assert!(cli.server);
        assert!(cli.force);
        assert_eq!(cli.profile.as_deref(), Some("release"));
        assert_eq!(cli.verbose, 2);
    }
}
