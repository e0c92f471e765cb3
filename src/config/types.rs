use std::collections::BTreeMap;
use std::path::Path;

use crate::archive::{ArchiveTarget, DEFAULT_MAX_BYTES};
use crate::platform::{ChannelId, ScopeId};

use super::cli::CliArgs;
use super::{env, toml};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pug.toml";

/// Per-scope PUG settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Create a text channel for lobbies and teams.
    pub team_text: bool,
    /// Create a voice channel for lobbies and teams.
    pub team_voice: bool,
    /// Channel transcripts are archived to on stop.
    pub archive: Option<ChannelId>,
}

/// PUG configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix shown in the join hint, e.g. `!pug join`.
    pub command_prefix: String,
    /// Team roles are named `{team_prefix} {n}`.
    pub team_prefix: String,
    /// Maximum transcript part size in bytes.
    pub archive_max_bytes: usize,
    /// Settings for scopes without an explicit entry.
    pub defaults: Settings,
    /// Per-scope settings.
    pub scopes: BTreeMap<ScopeId, Settings>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            team_prefix: "Team".to_string(),
            archive_max_bytes: DEFAULT_MAX_BYTES,
            defaults: Settings::default(),
            scopes: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from all sources with proper precedence.
    ///
    /// Precedence: CLI args > env vars > config file > defaults. A missing
    /// default config file is not an error; a missing explicit one is.
    pub fn load(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &cli_args.config {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        env::apply_env(&mut config);
        config.apply_cli(cli_args);
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        toml::load_from_file(path)
    }

    /// Parse TOML content into configuration.
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        toml::parse_toml(content)
    }

    /// Apply CLI arguments.
    pub(super) fn apply_cli(&mut self, args: &CliArgs) {
        if let Some(ref prefix) = args.command_prefix {
            self.command_prefix = prefix.clone();
        }
        if let Some(ref prefix) = args.team_prefix {
            self.team_prefix = prefix.clone();
        }
        if let Some(n) = args.archive_max_bytes {
            self.archive_max_bytes = n;
        }
        if args.team_text {
            self.defaults.team_text = true;
        }
        if args.team_voice {
            self.defaults.team_voice = true;
        }
    }

    /// Effective settings for `scope`.
    pub fn settings_for(&self, scope: ScopeId) -> Settings {
        self.scopes
            .get(&scope)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone())
    }

    /// Mutable settings for `scope`, seeded from the defaults on first use.
    pub fn settings_mut(&mut self, scope: ScopeId) -> &mut Settings {
        let defaults = &self.defaults;
        self.scopes.entry(scope).or_insert_with(|| defaults.clone())
    }

    /// Archive destination for `settings`, if one is set.
    pub fn archive_target(&self, settings: &Settings) -> Option<ArchiveTarget> {
        settings
            .archive
            .map(|channel| ArchiveTarget::new(channel).with_max_bytes(self.archive_max_bytes))
    }

    /// Generate default pug.toml content.
    pub fn default_toml() -> String {
        format!(
            r#"# PUG configuration

[pug]
command_prefix = "!"
team_prefix = "Team"
archive_max_bytes = {}

[defaults]
team_text = false
team_voice = false
archive = "none"

# Per-category overrides:
# [scope.123456789]
# team_text = true
# archive = 987654321
"#,
            DEFAULT_MAX_BYTES
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading config file.
    #[error("config I/O error: {0}")]
    Io(String),
    /// Parse error in config file.
    #[error("config parse error: {0}")]
    Parse(String),
}
