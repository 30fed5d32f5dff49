//! # Configuration
//!
//! Session settings read from the environment.
//!
//! Binaries start from [`Settings::from_env`] and then apply their own
//! command-line overrides on top.
//!
//! ## Environment Variables
//!
//! - `HEAPMETA_SNAPSHOT`: Snapshot file used by `--save-db` / `--load-db` (default: `metadata.json`)
//! - `HEAPMETA_BACKTRACE_FILE`: File holding gdb `backtrace` output used for captures
//! - `NO_COLOR`: Disable colored output when set to any non-empty value

use std::env;
use std::path::PathBuf;

/// Snapshot file used when nothing else is configured.
pub const DEFAULT_SNAPSHOT_PATH: &str = "metadata.json";

/// Resolved session settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings
{
    /// Where development snapshots are saved to and loaded from.
    pub snapshot_path: PathBuf,
    /// Whether addresses and headers are styled.
    pub color: bool,
    /// gdb `backtrace` output used when capturing backtraces.
    pub backtrace_file: Option<PathBuf>,
}

impl Default for Settings
{
    fn default() -> Self
    {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            color: true,
            backtrace_file: None,
        }
    }
}

impl Settings
{
    /// Build settings from the process environment.
    ///
    /// ## Errors
    ///
    /// `EmptyPath` when one of the path variables is set but empty.
    pub fn from_env() -> Result<Self, ConfigError>
    {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    ///
    /// ## Errors
    ///
    /// `EmptyPath` when one of the path variables is set but empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup("HEAPMETA_SNAPSHOT") {
            settings.snapshot_path = non_empty_path("HEAPMETA_SNAPSHOT", path)?;
        }
        if let Some(path) = lookup("HEAPMETA_BACKTRACE_FILE") {
            settings.backtrace_file = Some(non_empty_path("HEAPMETA_BACKTRACE_FILE", path)?);
        }
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            settings.color = false;
        }

        tracing::debug!(?settings, "loaded settings");
        Ok(settings)
    }
}

fn non_empty_path(variable: &'static str, value: String) -> Result<PathBuf, ConfigError>
{
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyPath(variable));
    }
    Ok(PathBuf::from(value))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError
{
    /// A path variable was set to an empty string
    #[error("{0} is set but empty")]
    EmptyPath(&'static str),
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
    {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults()
    {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.snapshot_path, PathBuf::from("metadata.json"));
        assert!(settings.color);
    }

    #[test]
    fn test_overrides()
    {
        let settings = Settings::from_lookup(lookup(&[
            ("HEAPMETA_SNAPSHOT", "/tmp/session.json"),
            ("HEAPMETA_BACKTRACE_FILE", "bt.txt"),
            ("NO_COLOR", "1"),
        ]))
        .unwrap();
        assert_eq!(settings.snapshot_path, PathBuf::from("/tmp/session.json"));
        assert_eq!(settings.backtrace_file, Some(PathBuf::from("bt.txt")));
        assert!(!settings.color);
    }

    #[test]
    fn test_empty_no_color_keeps_color()
    {
        let settings = Settings::from_lookup(lookup(&[("NO_COLOR", "")])).unwrap();
        assert!(settings.color);
    }

    #[test]
    fn test_empty_path_is_rejected()
    {
        let err = Settings::from_lookup(lookup(&[("HEAPMETA_SNAPSHOT", " ")])).unwrap_err();
        assert!(err.to_string().contains("HEAPMETA_SNAPSHOT"));
    }
}
