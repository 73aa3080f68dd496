//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `CARDIOSCAN_ARTIFACT_DIR` | `models` |
//! | `CARDIOSCAN_LOG_MODE` | `auto` (`file` when stdout is a terminal) |
//! | `CARDIOSCAN_LOG_FILE` | `cardioscan.log` |
//! | `CARDIOSCAN_REQUIRE_MANIFEST` | off |

use std::path::PathBuf;

use crate::adapters::LoadOptions;

pub const ARTIFACT_DIR_VAR: &str = "CARDIOSCAN_ARTIFACT_DIR";
pub const LOG_MODE_VAR: &str = "CARDIOSCAN_LOG_MODE";
pub const LOG_FILE_VAR: &str = "CARDIOSCAN_LOG_FILE";
pub const REQUIRE_MANIFEST_VAR: &str = "CARDIOSCAN_REQUIRE_MANIFEST";

const DEFAULT_ARTIFACT_DIR: &str = "models";
const DEFAULT_LOG_FILE: &str = "cardioscan.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when interactive (the TUI owns the terminal), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            "auto" => Self::Auto,
            other => {
                tracing::warn!("Unknown {LOG_MODE_VAR} {:?}, using auto", other);
                Self::Auto
            }
        }
    }

    /// Resolve `Auto` against whether stdout is a terminal.
    #[must_use]
    pub fn uses_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub require_manifest: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from(DEFAULT_ARTIFACT_DIR),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            require_manifest: false,
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            artifact_dir: get(ARTIFACT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            log_mode: get(LOG_MODE_VAR)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: get(LOG_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            require_manifest: get(REQUIRE_MANIFEST_VAR)
                .is_some_and(|v| parse_bool(&v)),
        }
    }

    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            require_manifest: self.require_manifest,
            ..LoadOptions::default()
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(config(&[]), AppConfig::default());
        assert_eq!(AppConfig::default().artifact_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            (ARTIFACT_DIR_VAR, "/opt/cardioscan/models"),
            (LOG_MODE_VAR, "Stdout"),
            (LOG_FILE_VAR, "/tmp/cs.log"),
            (REQUIRE_MANIFEST_VAR, "yes"),
        ]);
        assert_eq!(cfg.artifact_dir, PathBuf::from("/opt/cardioscan/models"));
        assert_eq!(cfg.log_mode, LogMode::Stdout);
        assert_eq!(cfg.log_file, PathBuf::from("/tmp/cs.log"));
        assert!(cfg.load_options().require_manifest);
    }

    #[test]
    fn test_blank_and_unknown_values() {
        let cfg = config(&[
            (ARTIFACT_DIR_VAR, "  "),
            (LOG_MODE_VAR, "syslog"),
            (REQUIRE_MANIFEST_VAR, "0"),
        ]);
        assert_eq!(cfg.artifact_dir, PathBuf::from("models"));
        assert_eq!(cfg.log_mode, LogMode::Auto);
        assert!(!cfg.require_manifest);
    }

    #[test]
    fn test_auto_follows_terminal() {
        assert!(LogMode::Auto.uses_file(true));
        assert!(!LogMode::Auto.uses_file(false));
        assert!(LogMode::File.uses_file(false));
        assert!(!LogMode::Stdout.uses_file(true));
    }
}
