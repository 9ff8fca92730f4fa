//! Load configuration from the XDG `config.toml` and a `.env` file, then apply it to the
//! process environment with priority: **existing env > .env > XDG**.
//!
//! The `.env` file is looked up next to the running executable (then its parent, then the
//! current directory) so a binary started from anywhere finds its own settings.

mod dotenv_file;
mod xdg_toml;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(#[from] dotenv::Error),
}

/// What [`load_and_apply`] did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Applied {
    /// The `.env` file that was read, if any.
    pub dotenv_path: Option<PathBuf>,
    /// Keys newly set in the process environment, sorted.
    pub keys: Vec<String>,
}

/// Picks the value for every key present in either file, skipping keys for which
/// `is_set` is true. `.env` beats XDG.
fn resolve(
    dotenv_map: &HashMap<String, String>,
    xdg_map: &HashMap<String, String>,
    is_set: impl Fn(&str) -> bool,
) -> Vec<(String, String)> {
    let mut merged: HashMap<&String, &String> = xdg_map.iter().collect();
    merged.extend(dotenv_map.iter());
    let mut out: Vec<(String, String)> = merged
        .into_iter()
        .filter(|(k, _)| !is_set(k))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    out.sort();
    out
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` `[env]` and the first `.env` found,
/// then sets the environment variables that are **not** already set.
///
/// * `app_name`: e.g. `"toolloop"`; the XDG path is `~/.config/<app_name>/config.toml`.
/// * `override_dir`: if `Some`, only this directory is searched for `.env`.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let xdg_map = xdg_toml::load_env_map(app_name)?;
    let (dotenv_map, dotenv_path) = dotenv_file::load_env_map(override_dir)?;

    let pairs = resolve(&dotenv_map, &xdg_map, |key| std::env::var_os(key).is_some());
    let mut keys = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        std::env::set_var(&key, value);
        keys.push(key);
    }
    Ok(Applied { dotenv_path, keys })
}
