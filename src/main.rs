use std::process;

use clap::Parser;

use pug::config::{CliArgs, Command, Config, SimulateArgs};

mod cmd;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = CliArgs::parse();
    let config = match Config::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Default command is a simulation with default parameters
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Command::Simulate(SimulateArgs::default()));

    let result = match command {
        Command::Init => cmd::cmd_init(),
        Command::Simulate(args) => cmd::cmd_simulate(&config, &args).await,
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
