use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// CLI arguments parsed from command line.
#[derive(Debug, Default, Parser)]
#[command(name = "pug")]
#[command(version)]
#[command(about = "Run pick-up group lobbies against an in-memory guild")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to config file (defaults to ./pug.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Command prefix shown in join hints.
    #[arg(long, global = true)]
    pub command_prefix: Option<String>,

    /// Team role name prefix.
    #[arg(long, global = true)]
    pub team_prefix: Option<String>,

    /// Maximum transcript part size in bytes.
    #[arg(long, global = true, value_parser = parse_max_bytes)]
    pub archive_max_bytes: Option<usize>,

    /// Create text channels for lobbies and teams.
    #[arg(long, global = true)]
    pub team_text: bool,

    /// Create voice channels for lobbies and teams.
    #[arg(long, global = true)]
    pub team_voice: bool,
}

/// PUG subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write a default pug.toml to the working directory.
    Init,
    /// Simulate a full PUG: start, join, split, late join, stop.
    Simulate(SimulateArgs),
}

/// Parameters of a simulated PUG.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SimulateArgs {
    /// Category the PUG runs in.
    #[arg(long, default_value = "Games")]
    pub category: String,

    /// Members joining before the split.
    #[arg(long, default_value_t = 10)]
    pub players: usize,

    /// Members joining after the split.
    #[arg(long, default_value_t = 1)]
    pub late: usize,

    /// Members per team.
    #[arg(long, conflicts_with = "count")]
    pub size: Option<usize>,

    /// Number of teams.
    #[arg(long)]
    pub count: Option<usize>,

    /// Archive team channels on stop.
    #[arg(long)]
    pub archive: bool,

    /// Seed for the team shuffle.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            category: "Games".to_string(),
            players: 10,
            late: 1,
            size: None,
            count: None,
            archive: false,
            seed: None,
        }
    }
}

fn parse_max_bytes(val: &str) -> Result<usize, String> {
    match val.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err("must be greater than 0".to_string()),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse CLI arguments from an iterator.
pub fn parse_args<I>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = String>,
{
    CliArgs::try_parse_from(args)
}
