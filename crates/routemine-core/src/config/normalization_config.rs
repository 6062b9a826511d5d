//! Normalization configuration.
//!
//! `NormalizationOptions` is the TOML-facing section (every field optional).
//! `NormalizationConfig` is the closed, validated form the normalizer consumes;
//! it can only be obtained through `from_options` or `Default`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::collections::{FxHashMap, FxHashSet};

/// `[normalization]` section of `routemine.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizationOptions {
    /// Trim surrounding whitespace from each step. Default: true.
    pub strip_whitespace: Option<bool>,
    /// Case-fold steps to upper case. Default: true.
    pub uppercase: Option<bool>,
    /// Collapse a step equal to the previous kept step. Default: true.
    pub remove_immediate_repeats: Option<bool>,
    /// Keep only the first visit of every step anywhere in the routing. Default: false.
    pub remove_self_loops_anywhere: Option<bool>,
    /// Steps removed outright, e.g. inspection stations.
    pub drop_steps: Vec<String>,
    /// Raw code → family code, applied before drop/repeat logic.
    pub map_codes: BTreeMap<String, String>,
}

impl NormalizationOptions {
    pub fn effective_strip_whitespace(&self) -> bool {
        self.strip_whitespace.unwrap_or(true)
    }

    pub fn effective_uppercase(&self) -> bool {
        self.uppercase.unwrap_or(true)
    }

    pub fn effective_remove_immediate_repeats(&self) -> bool {
        self.remove_immediate_repeats.unwrap_or(true)
    }

    pub fn effective_remove_self_loops_anywhere(&self) -> bool {
        self.remove_self_loops_anywhere.unwrap_or(false)
    }
}

/// Immutable, validated normalization settings.
///
/// Construction canonicalizes `drop_steps` and both sides of `map_codes` with
/// the same strip/uppercase rules applied to tokens, and resolves mapping
/// chains (`A→B`, `B→C` becomes `A→C`, `B→C`). Every mapped value is
/// therefore a fixed point, which keeps normalization idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationConfig {
    strip_whitespace: bool,
    uppercase: bool,
    remove_immediate_repeats: bool,
    remove_self_loops_anywhere: bool,
    drop_steps: FxHashSet<String>,
    map_codes: FxHashMap<String, String>,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            strip_whitespace: true,
            uppercase: true,
            remove_immediate_repeats: true,
            remove_self_loops_anywhere: false,
            drop_steps: FxHashSet::default(),
            map_codes: FxHashMap::default(),
        }
    }
}

impl NormalizationConfig {
    /// Build and validate a config from its TOML section.
    ///
    /// Fails when two raw codes collapse onto the same canonical key with
    /// different targets, or when the code map contains a cycle.
    pub fn from_options(options: &NormalizationOptions) -> Result<Self, ConfigError> {
        let mut config = Self {
            strip_whitespace: options.effective_strip_whitespace(),
            uppercase: options.effective_uppercase(),
            remove_immediate_repeats: options.effective_remove_immediate_repeats(),
            remove_self_loops_anywhere: options.effective_remove_self_loops_anywhere(),
            drop_steps: FxHashSet::default(),
            map_codes: FxHashMap::default(),
        };

        let drop_steps: FxHashSet<String> = options
            .drop_steps
            .iter()
            .map(|step| config.canonicalize(step))
            .collect();

        let mut direct: FxHashMap<String, String> = FxHashMap::default();
        for (raw_key, raw_value) in &options.map_codes {
            let key = config.canonicalize(raw_key);
            let value = config.canonicalize(raw_value);
            if let Some(existing) = direct.get(&key) {
                if *existing != value {
                    return Err(ConfigError::ValidationFailed {
                        field: "normalization.map_codes".to_string(),
                        message: format!(
                            "code '{raw_key}' canonicalizes to '{key}', already mapped to '{existing}'"
                        ),
                    });
                }
            }
            direct.insert(key, value);
        }

        config.map_codes = resolve_chains(&direct)?;
        config.drop_steps = drop_steps;
        Ok(config)
    }

    pub fn strip_whitespace(&self) -> bool {
        self.strip_whitespace
    }

    pub fn uppercase(&self) -> bool {
        self.uppercase
    }

    pub fn remove_immediate_repeats(&self) -> bool {
        self.remove_immediate_repeats
    }

    pub fn remove_self_loops_anywhere(&self) -> bool {
        self.remove_self_loops_anywhere
    }

    pub fn drop_steps(&self) -> &FxHashSet<String> {
        &self.drop_steps
    }

    pub fn map_codes(&self) -> &FxHashMap<String, String> {
        &self.map_codes
    }

    /// Apply the text-level rules (strip, uppercase) to one raw step.
    pub fn canonicalize(&self, raw: &str) -> String {
        let text = if self.strip_whitespace { raw.trim() } else { raw };
        if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }

    /// Canonicalize one raw step and replace it by its family code, if mapped.
    pub fn canonical_step(&self, raw: &str) -> String {
        let token = self.canonicalize(raw);
        match self.map_codes.get(&token) {
            Some(family) => family.clone(),
            None => token,
        }
    }

    /// Whether a canonical step is removed outright.
    pub fn is_dropped(&self, token: &str) -> bool {
        self.drop_steps.contains(token)
    }
}

/// Follow every mapping to its final target.
fn resolve_chains(
    direct: &FxHashMap<String, String>,
) -> Result<FxHashMap<String, String>, ConfigError> {
    let mut resolved = FxHashMap::default();
    for (key, first) in direct {
        let mut target = first;
        let mut hops = 0usize;
        while let Some(next) = direct.get(target) {
            if next == target {
                break;
            }
            hops += 1;
            if hops > direct.len() {
                return Err(ConfigError::ValidationFailed {
                    field: "normalization.map_codes".to_string(),
                    message: format!("mapping cycle through '{key}'"),
                });
            }
            target = next;
        }
        resolved.insert(key.clone(), target.clone());
    }
    Ok(resolved)
}
