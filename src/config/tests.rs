use std::collections::HashMap;
use std::fs;

use tempfile::TempDir;

use super::*;
use crate::platform::{ChannelId, ScopeId};

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let config = Config::default();
    assert_eq!(config.command_prefix, "!");
    assert_eq!(config.team_prefix, "Team");
    assert_eq!(config.archive_max_bytes, 8_000_000);
    assert_eq!(config.defaults, Settings::default());
    assert!(config.scopes.is_empty());
}

#[test]
fn test_parse_toml_sections() {
    let content = r#"
[pug]
command_prefix = "?"
team_prefix = "Squad"
archive_max_bytes = 1_000

[defaults]
team_text = true
archive = 55
"#;
    let config = Config::parse_toml(content).unwrap();
    assert_eq!(config.command_prefix, "?");
    assert_eq!(config.team_prefix, "Squad");
    assert_eq!(config.archive_max_bytes, 1000);
    assert!(config.defaults.team_text);
    assert!(!config.defaults.team_voice);
    assert_eq!(config.defaults.archive, Some(ChannelId(55)));
}

#[test]
fn test_scope_section_inherits_defaults_declared_later() {
    let content = r#"
[scope.42]
team_voice = true

[defaults]
team_text = true
"#;
    let config = Config::parse_toml(content).unwrap();
    let scoped = config.settings_for(ScopeId(42));
    assert!(scoped.team_text);
    assert!(scoped.team_voice);

    let other = config.settings_for(ScopeId(7));
    assert!(other.team_text);
    assert!(!other.team_voice);
}

#[test]
fn test_parse_toml_archive_none() {
    let content = r#"
[defaults]
archive = 10

[scope.1]
archive = "none"
"#;
    let config = Config::parse_toml(content).unwrap();
    assert_eq!(config.settings_for(ScopeId(1)).archive, None);
    assert_eq!(config.settings_for(ScopeId(2)).archive, Some(ChannelId(10)));
}

#[test]
fn test_parse_toml_comments_and_unknown_keys() {
    let content = r#"
# top comment
[pug]
team_prefix = "Red # Blue"  # trailing comment
unknown = 3

[somewhere_else]
team_text = "not a bool, ignored"
"#;
    let config = Config::parse_toml(content).unwrap();
    assert_eq!(config.team_prefix, "Red # Blue");
    assert!(!config.defaults.team_text);
}

#[test]
fn test_parse_toml_invalid_values() {
    assert!(matches!(
        Config::parse_toml("[defaults]\nteam_text = maybe\n"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::parse_toml("[defaults]\narchive = general\n"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::parse_toml("[pug]\narchive_max_bytes = 0\n"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        Config::parse_toml("[scope.abc]\nteam_text = true\n"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_default_toml_round_trips_to_defaults() {
    let config = Config::parse_toml(&Config::default_toml()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("pug.toml");
    fs::write(&path, "[pug]\nteam_prefix = \"Group\"\n").expect("write config");

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.team_prefix, "Group");
}

#[test]
fn test_load_from_missing_file_is_io_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = Config::load_from_file(temp.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("config I/O error"));
}

#[test]
fn test_env_overrides_file_values() {
    let mut config = Config::parse_toml("[pug]\nteam_prefix = \"File\"\n").unwrap();
    env::apply_vars(
        &mut config,
        vars(&[
            ("PUG_TEAM_PREFIX", "Env"),
            ("PUG_TEAM_TEXT", "1"),
            ("PUG_TEAM_VOICE", "true"),
            ("PUG_ARCHIVE", "77"),
            ("PUG_ARCHIVE_MAX_BYTES", "2048"),
        ]),
    );
    assert_eq!(config.team_prefix, "Env");
    assert!(config.defaults.team_text);
    assert!(config.defaults.team_voice);
    assert_eq!(config.defaults.archive, Some(ChannelId(77)));
    assert_eq!(config.archive_max_bytes, 2048);
}

#[test]
fn test_env_ignores_invalid_values() {
    let mut config = Config::default();
    env::apply_vars(
        &mut config,
        vars(&[
            ("PUG_TEAM_TEXT", "perhaps"),
            ("PUG_ARCHIVE_MAX_BYTES", "lots"),
            ("PUG_ARCHIVE", "archive-channel"),
        ]),
    );
    assert_eq!(config, Config::default());
}

#[test]
fn test_cli_overrides_everything() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("custom.toml");
    fs::write(&path, "[pug]\nteam_prefix = \"File\"\ncommand_prefix = \"?\"\n")
        .expect("write config");

    let args = parse_args(
        [
            "pug",
            "--config",
            path.to_str().unwrap(),
            "--team-prefix",
            "Cli",
            "--team-voice",
        ]
        .map(String::from),
    )
    .unwrap();
    let config = Config::load(&args).unwrap();
    assert_eq!(config.team_prefix, "Cli");
    assert_eq!(config.command_prefix, "?");
    assert!(config.defaults.team_voice);
}

#[test]
fn test_load_with_missing_explicit_file_fails() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.path().join("nope.toml");
    let args = parse_args(["pug", "-c", missing.to_str().unwrap()].map(String::from)).unwrap();
    assert!(Config::load(&args).is_err());
}

#[test]
fn test_parse_simulate_subcommand() {
    let args = parse_args(
        ["pug", "simulate", "--players", "7", "--count", "2", "--seed", "9"].map(String::from),
    )
    .unwrap();
    let Some(Command::Simulate(sim)) = args.command else {
        panic!("expected simulate");
    };
    assert_eq!(sim.players, 7);
    assert_eq!(sim.count, Some(2));
    assert_eq!(sim.size, None);
    assert_eq!(sim.seed, Some(9));
    assert_eq!(sim.category, "Games");
}

#[test]
fn test_parse_args_rejects_size_and_count() {
    let result = parse_args(
        ["pug", "simulate", "--size", "3", "--count", "2"].map(String::from),
    );
    assert!(result.is_err());
}

#[test]
fn test_parse_args_rejects_zero_archive_max_bytes() {
    assert!(parse_args(["pug", "--archive-max-bytes", "0"].map(String::from)).is_err());
    assert!(parse_args(["pug", "--archive-max-bytes", "lots"].map(String::from)).is_err());

    let args = parse_args(["pug", "--archive-max-bytes", "4096"].map(String::from)).unwrap();
    assert_eq!(args.archive_max_bytes, Some(4096));
}

#[test]
fn test_settings_mut_seeds_from_defaults() {
    let mut config = Config::default();
    config.defaults.team_text = true;
    config.settings_mut(ScopeId(3)).team_voice = true;

    let scoped = config.settings_for(ScopeId(3));
    assert!(scoped.team_text);
    assert!(scoped.team_voice);
    assert!(!config.settings_for(ScopeId(4)).team_voice);
}

#[test]
fn test_archive_target_uses_max_bytes() {
    let mut config = Config::default();
    config.archive_max_bytes = 512;
    assert!(config.archive_target(&config.settings_for(ScopeId(1))).is_none());

    config.settings_mut(ScopeId(1)).archive = Some(ChannelId(9));
    let target = config
        .archive_target(&config.settings_for(ScopeId(1)))
        .unwrap();
    assert_eq!(target.channel, ChannelId(9));
    assert_eq!(target.max_bytes, 512);
}
