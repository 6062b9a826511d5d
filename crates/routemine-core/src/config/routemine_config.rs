//! Top-level routemine configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ClusteringConfig, IoConfig, LibraryConfig, NormalizationConfig, NormalizationOptions};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "routemine.toml";

/// Top-level configuration aggregating all sections.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`ROUTEMINE_*`)
/// 3. Project config (`routemine.toml` in project root)
/// 4. User config (`~/.routemine/config.toml`)
/// 5. Compiled defaults
///
/// Unknown keys are rejected: a misspelled option is a fatal error.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RouteMineConfig {
    pub normalization: NormalizationOptions,
    pub clustering: ClusteringConfig,
    pub library: LibraryConfig,
    pub io: IoConfig,
}

/// Options exposed by a command surface.
///
/// Values arrive as the user typed them; `max_edit_distance` stays textual so
/// a non-integer can be reported with the received value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input_path: Option<PathBuf>,
    pub output_prefix: Option<String>,
    /// Comma-separated list, e.g. "CMM,ET".
    pub drop_steps: Option<String>,
    pub no_immediate_repeat_removal: bool,
    pub cluster: bool,
    pub max_edit_distance: Option<String>,
}

impl RouteMineConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                Self::merge_toml_file(&mut config, &user_config_path)?;
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli)?;
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "configuration resolved");

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &RouteMineConfig) -> Result<(), ConfigError> {
        if let Some(distance) = config.clustering.max_edit_distance {
            if distance < 0 {
                return Err(ConfigError::InvalidValue {
                    field: "clustering.max_edit_distance".to_string(),
                    value: distance.to_string(),
                    message: "must be a non-negative integer".to_string(),
                });
            }
        }
        if let Some(limit) = config.library.example_limit {
            if limit == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "library.example_limit".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        NormalizationConfig::from_options(&config.normalization)?;
        Ok(())
    }

    /// The closed normalization config for this run.
    pub fn normalization_config(&self) -> Result<NormalizationConfig, ConfigError> {
        NormalizationConfig::from_options(&self.normalization)
    }

    /// The clustering threshold when clustering is enabled, `None` otherwise.
    pub fn clustering_threshold(&self) -> Option<i64> {
        self.clustering
            .effective_enabled()
            .then(|| self.clustering.effective_max_edit_distance())
    }

    /// Returns the user config path: `~/.routemine/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        dirs_path().map(|d| d.join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut RouteMineConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: RouteMineConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base` values
    /// only when `other` sets them.
    fn merge(base: &mut RouteMineConfig, other: &RouteMineConfig) {
        // Normalization
        let (b, o) = (&mut base.normalization, &other.normalization);
        if o.strip_whitespace.is_some() {
            b.strip_whitespace = o.strip_whitespace;
        }
        if o.uppercase.is_some() {
            b.uppercase = o.uppercase;
        }
        if o.remove_immediate_repeats.is_some() {
            b.remove_immediate_repeats = o.remove_immediate_repeats;
        }
        if o.remove_self_loops_anywhere.is_some() {
            b.remove_self_loops_anywhere = o.remove_self_loops_anywhere;
        }
        if !o.drop_steps.is_empty() {
            b.drop_steps = o.drop_steps.clone();
        }
        if !o.map_codes.is_empty() {
            b.map_codes = o.map_codes.clone();
        }

        // Clustering
        if other.clustering.enabled.is_some() {
            base.clustering.enabled = other.clustering.enabled;
        }
        if other.clustering.max_edit_distance.is_some() {
            base.clustering.max_edit_distance = other.clustering.max_edit_distance;
        }

        // Library
        if other.library.example_limit.is_some() {
            base.library.example_limit = other.library.example_limit;
        }
        if other.library.summary_top.is_some() {
            base.library.summary_top = other.library.summary_top;
        }
        if other.library.top_flows.is_some() {
            base.library.top_flows = other.library.top_flows;
        }

        // I/O
        if other.io.input_path.is_some() {
            base.io.input_path = other.io.input_path.clone();
        }
        if other.io.output_prefix.is_some() {
            base.io.output_prefix = other.io.output_prefix.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `ROUTEMINE_DROP_STEPS`, `ROUTEMINE_MAX_EDIT_DISTANCE`, etc.
    fn apply_env_overrides(config: &mut RouteMineConfig) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("ROUTEMINE_DROP_STEPS") {
            config.normalization.drop_steps = parse_drop_steps(&val);
        }
        if let Ok(val) = std::env::var("ROUTEMINE_REMOVE_IMMEDIATE_REPEATS") {
            config.normalization.remove_immediate_repeats =
                Some(parse_bool("ROUTEMINE_REMOVE_IMMEDIATE_REPEATS", &val)?);
        }
        if let Ok(val) = std::env::var("ROUTEMINE_CLUSTER") {
            config.clustering.enabled = Some(parse_bool("ROUTEMINE_CLUSTER", &val)?);
        }
        if let Ok(val) = std::env::var("ROUTEMINE_MAX_EDIT_DISTANCE") {
            config.clustering.max_edit_distance = Some(i64::from(parse_edit_distance(&val)?));
        }
        if let Ok(val) = std::env::var("ROUTEMINE_OUTPUT_PREFIX") {
            config.io.output_prefix = Some(val);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut RouteMineConfig, cli: &CliOverrides) -> Result<(), ConfigError> {
        if let Some(ref path) = cli.input_path {
            config.io.input_path = Some(path.clone());
        }
        if let Some(ref prefix) = cli.output_prefix {
            config.io.output_prefix = Some(prefix.clone());
        }
        if let Some(ref steps) = cli.drop_steps {
            config.normalization.drop_steps = parse_drop_steps(steps);
        }
        if cli.no_immediate_repeat_removal {
            config.normalization.remove_immediate_repeats = Some(false);
        }
        if cli.cluster {
            config.clustering.enabled = Some(true);
        }
        if let Some(ref raw) = cli.max_edit_distance {
            config.clustering.max_edit_distance = Some(i64::from(parse_edit_distance(raw)?));
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Split a comma-separated drop-steps list, trimming and upper-casing each
/// entry and skipping blanks.
pub fn parse_drop_steps(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Parse a textual edit-distance threshold. Negative or non-integer input is fatal.
pub fn parse_edit_distance(raw: &str) -> Result<u32, ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidValue {
        field: "clustering.max_edit_distance".to_string(),
        value: raw.to_string(),
        message: message.to_string(),
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("expected a non-negative integer"))?;
    if value < 0 {
        return Err(invalid("must be a non-negative integer"));
    }
    u32::try_from(value).map_err(|_| invalid("exceeds the supported range"))
}

fn parse_bool(field: &str, raw: &str) -> Result<bool, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        message: "expected true or false".to_string(),
    })
}

/// Returns the user-level config directory: `~/.routemine/`.
fn dirs_path() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".routemine"))
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
