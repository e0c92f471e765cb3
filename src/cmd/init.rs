use std::fs;
use std::path::Path;

use pug::color;
use pug::config::{Config, DEFAULT_CONFIG_FILE};

/// Write a default pug.toml unless one exists.
pub fn cmd_init() -> Result<(), String> {
    let path = Path::new(DEFAULT_CONFIG_FILE);
    if path.exists() {
        return Err(format!("{} already exists", DEFAULT_CONFIG_FILE));
    }
    fs::write(path, Config::default_toml())
        .map_err(|e| format!("failed to write {}: {}", DEFAULT_CONFIG_FILE, e))?;
    println!("{} {}", color::label("Created"), DEFAULT_CONFIG_FILE);
    Ok(())
}
