//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/qsheet/qsheet.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `QSHEET_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// Public sheet loaded into an empty store at startup.
pub const DEFAULT_SEED_URL: &str =
    "https://node.codolio.com/api/question-tracker/v1/sheet/public/get-sheet-by-slug/striver-sde-sheet";

/// How new node ids are minted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    #[default]
    Uuid,
    Sequential,
}

impl std::str::FromStr for IdScheme {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdScheme::Uuid),
            "sequential" => Ok(IdScheme::Sequential),
            other => Err(ApplicationError::Config {
                message: format!("unknown id_scheme: {other}"),
            }),
        }
    }
}

/// Raw settings for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub seed_url: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub auto_seed: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub id_scheme: Option<IdScheme>,
}

/// Unified configuration for qsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Endpoint returning the sheet JSON
    pub seed_url: String,
    /// Local JSON payload used instead of `seed_url` when set
    pub seed_file: Option<PathBuf>,
    /// Load the seed at startup when the sheet is empty
    pub auto_seed: bool,
    /// HTTP timeout for the seed fetch
    pub timeout_secs: u64,
    /// Id generator for new nodes
    pub id_scheme: IdScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_url: DEFAULT_SEED_URL.to_string(),
            seed_file: None,
            auto_seed: true,
            timeout_secs: 10,
            id_scheme: IdScheme::Uuid,
        }
    }
}

/// Get the XDG config directory for qsheet.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "qsheet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("qsheet.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            seed_url: overlay
                .seed_url
                .clone()
                .unwrap_or_else(|| self.seed_url.clone()),
            seed_file: overlay.seed_file.clone().or_else(|| self.seed_file.clone()),
            auto_seed: overlay.auto_seed.unwrap_or(self.auto_seed),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            id_scheme: overlay.id_scheme.unwrap_or(self.id_scheme),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(file) = &self.seed_file {
            self.seed_file = Some(PathBuf::from(expand_path(&file.to_string_lossy())));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = explicit {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply QSHEET_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::overlay_env(settings, env_source())
    }

    fn overlay_env(mut settings: Self, source: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("seed_url") {
            settings.seed_url = val;
        }
        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_bool("auto_seed") {
            settings.auto_seed = val;
        }
        if let Ok(val) = config.get_int("timeout_secs") {
            settings.timeout_secs = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("timeout_secs must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("id_scheme") {
            settings.id_scheme = val.parse()?;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# qsheet configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/qsheet/qsheet.toml
#   Explicit: --config <file>
#   Env:      QSHEET_* environment variables (e.g. QSHEET_SEED_FILE)

# Endpoint returning the sheet JSON
# seed_url = "{DEFAULT_SEED_URL}"

# Read the seed from a local file instead (supports ~ and $VAR)
# seed_file = "~/sheets/striver.json"

# Load the seed at startup when the sheet is empty
# auto_seed = true

# HTTP timeout in seconds
# timeout_secs = 10

# "uuid" or "sequential" (t-1, s-1, q-1, ...)
# id_scheme = "uuid"
"#
        )
    }
}

/// `QSHEET_SEED_URL` style variables; the prefix is joined with a single `_`.
fn env_source() -> Environment {
    Environment::with_prefix("QSHEET")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_seeds_from_public_sheet() {
        let settings = Settings::default();
        assert_eq!(settings.seed_url, DEFAULT_SEED_URL);
        assert!(settings.auto_seed);
        assert!(settings.seed_file.is_none());
        assert_eq!(settings.id_scheme, IdScheme::Uuid);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let overlay = RawSettings {
            auto_seed: Some(false),
            timeout_secs: Some(3),
            ..RawSettings::default()
        };
        let merged = Settings::default().merge_with(&overlay);

        assert!(!merged.auto_seed);
        assert_eq!(merged.timeout_secs, 3);
        assert_eq!(merged.seed_url, DEFAULT_SEED_URL);
    }

    #[test]
    fn given_tilde_in_seed_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            seed_file: Some(PathBuf::from("~/sheet.json")),
            ..Settings::default()
        };
        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let file = settings.seed_file.unwrap();
        assert!(file.to_string_lossy().starts_with(&home));
    }

    #[test]
    fn given_id_scheme_strings_when_parsing_then_case_insensitive() {
        assert_eq!("Sequential".parse::<IdScheme>().unwrap(), IdScheme::Sequential);
        assert_eq!("uuid".parse::<IdScheme>().unwrap(), IdScheme::Uuid);
        assert!("random".parse::<IdScheme>().is_err());
    }

    #[test]
    fn given_settings_when_rendered_as_toml_then_round_trips() {
        let settings = Settings::default();
        let rendered = settings.to_toml().unwrap();
        let parsed: Settings = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let parsed: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(parsed.seed_url.is_none());
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env_source().source(Some(map))
    }

    #[test]
    fn given_single_underscore_vars_when_overlaying_env_then_applied() {
        let settings = Settings::overlay_env(
            Settings::default(),
            env(&[
                ("QSHEET_SEED_URL", "http://localhost/sheet"),
                ("QSHEET_AUTO_SEED", "false"),
                ("QSHEET_TIMEOUT_SECS", "77"),
                ("QSHEET_ID_SCHEME", "sequential"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.seed_url, "http://localhost/sheet");
        assert!(!settings.auto_seed);
        assert_eq!(settings.timeout_secs, 77);
        assert_eq!(settings.id_scheme, IdScheme::Sequential);
    }

    #[test]
    fn given_unrelated_vars_when_overlaying_env_then_settings_unchanged() {
        let settings =
            Settings::overlay_env(Settings::default(), env(&[("OTHER_TIMEOUT_SECS", "5")])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn given_bad_id_scheme_var_when_overlaying_env_then_config_error() {
        let result =
            Settings::overlay_env(Settings::default(), env(&[("QSHEET_ID_SCHEME", "random")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }
}
