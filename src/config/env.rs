use std::env;

use super::toml::{parse_bool, parse_channel};
use super::types::Config;

pub(super) fn apply_env(config: &mut Config) {
    apply_vars(config, |key| env::var(key).ok());
}

/// Apply `PUG_*` variables read through `var`. Invalid values are skipped.
pub(super) fn apply_vars<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = var("PUG_COMMAND_PREFIX") {
        config.command_prefix = val;
    }
    if let Some(val) = var("PUG_TEAM_PREFIX") {
        config.team_prefix = val;
    }
    if let Some(val) = var("PUG_ARCHIVE_MAX_BYTES") {
        match val.parse::<usize>() {
            Ok(n) if n > 0 => config.archive_max_bytes = n,
            _ => log::warn!("ignoring invalid PUG_ARCHIVE_MAX_BYTES: {}", val),
        }
    }
    if let Some(val) = var("PUG_TEAM_TEXT") {
        if let Ok(on) = parse_env_bool(&val) {
            config.defaults.team_text = on;
        }
    }
    if let Some(val) = var("PUG_TEAM_VOICE") {
        if let Ok(on) = parse_env_bool(&val) {
            config.defaults.team_voice = on;
        }
    }
    if let Some(val) = var("PUG_ARCHIVE") {
        match parse_channel("env", "PUG_ARCHIVE", &val) {
            Ok(channel) => config.defaults.archive = channel,
            Err(e) => log::warn!("ignoring {}", e),
        }
    }
}

fn parse_env_bool(val: &str) -> Result<bool, ()> {
    match val {
        "1" => Ok(true),
        "0" => Ok(false),
        _ => parse_bool("env", "bool", val).map_err(|_| ()),
    }
}
