use std::fs;
use std::path::Path;

use crate::platform::{ChannelId, ScopeId};

use super::types::{Config, ConfigError, Settings};

pub(super) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(&path).map_err(|e| {
        ConfigError::Io(format!("failed to read {}: {}", path.as_ref().display(), e))
    })?;
    Config::parse_toml(&content)
}

pub(super) fn parse_toml(content: &str) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let mut current_section = String::new();
    // Scope sections start from the defaults, which may appear later in the file.
    let mut scoped: Vec<(ScopeId, String, String)> = Vec::new();

    for line in content.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            current_section = line[1..line.len() - 1].trim().to_string();
            continue;
        }

        let Some((key, value)) = parse_toml_line(line) else {
            continue;
        };

        match current_section.as_str() {
            "pug" => apply_pug_key(&mut config, key, value)?,
            "defaults" => apply_settings_key(&mut config.defaults, "defaults", key, value)?,
            section => {
                if let Some(id) = section.strip_prefix("scope.") {
                    let id = id
                        .trim_matches('"')
                        .parse::<u64>()
                        .map_err(|_| ConfigError::Parse(format!("invalid scope id: {}", id)))?;
                    scoped.push((ScopeId(id), key.to_string(), value.to_string()));
                }
                // Ignore unknown sections
            }
        }
    }

    for (scope, key, value) in scoped {
        let section = format!("scope.{}", scope);
        let settings = config.settings_mut(scope);
        apply_settings_key(settings, &section, &key, &value)?;
    }

    Ok(config)
}

fn apply_pug_key(config: &mut Config, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "command_prefix" => config.command_prefix = unquote(value).to_string(),
        "team_prefix" => config.team_prefix = unquote(value).to_string(),
        "archive_max_bytes" => {
            config.archive_max_bytes = value
                .replace('_', "")
                .parse()
                .ok()
                .filter(|&n: &usize| n > 0)
                .ok_or_else(|| {
                    ConfigError::Parse(format!("invalid pug.archive_max_bytes: {}", value))
                })?;
        }
        _ => {} // Ignore unknown keys
    }
    Ok(())
}

fn apply_settings_key(
    settings: &mut Settings,
    section: &str,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match key {
        "team_text" => settings.team_text = parse_bool(section, key, value)?,
        "team_voice" => settings.team_voice = parse_bool(section, key, value)?,
        "archive" => settings.archive = parse_channel(section, key, value)?,
        _ => {}
    }
    Ok(())
}

pub(super) fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigError> {
    match unquote(value).to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::Parse(format!(
            "invalid {}.{}: {}",
            section, key, value
        ))),
    }
}

/// `"none"` or an empty string unsets the channel.
pub(super) fn parse_channel(
    section: &str,
    key: &str,
    value: &str,
) -> Result<Option<ChannelId>, ConfigError> {
    let value = unquote(value);
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse::<u64>()
        .map(|id| Some(ChannelId(id)))
        .map_err(|_| ConfigError::Parse(format!("invalid {}.{}: {}", section, key, value)))
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse a TOML line into key-value pair.
fn parse_toml_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}
