//! Configuration loading for pug.
//!
//! Supports pug.toml, CLI flags, and environment variables.
//! Precedence (highest to lowest): CLI flags > env vars > config file > defaults.

mod cli;
mod env;
mod toml;
mod types;

pub use cli::{parse_args, CliArgs, Command, SimulateArgs};
pub use types::{Config, ConfigError, Settings, DEFAULT_CONFIG_FILE};

#[cfg(test)]
mod tests;
