//! Configuration management for `textguard-core`.
//!
//! A configuration is a default preset name plus a table of named presets,
//! each mapping step names to raw step specs. It is stored as YAML. This
//! module loads and validates that table, merges a user file over the
//! built-in presets, and merges per-call overrides into one preset.
//!
//! ## Override merge policy
//!
//! [`merge_overrides`] and [`merge_value`] merge recursively:
//!
//! * map + map: merged key by key, keys present on one side only are kept;
//! * list + list: concatenated, base items first, duplicates kept;
//! * anything else: the override wins. A `null` override therefore
//!   disables a step, and a scalar replaces an options map.
//!
//! License: MIT OR APACHE 2.0

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::TextGuardError;
use crate::step::{StepOptions, StepSpec};

/// Preset used when a configuration names none.
pub const DEFAULT_PRESET: &str = "safe";

/// The preset table plus the name of the default preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextGuardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    pub presets: Map<String, Value>,
}

impl TextGuardConfig {
    /// Loads a configuration from a YAML file and checks its structure.
    ///
    /// The file does not need to define its default preset; that is only
    /// required of the merged configuration (see [`TextGuardConfig::validate`]).
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading presets from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate_presets()?;
        info!("Loaded {} preset(s) from file {}.", config.presets.len(), path.display());
        Ok(config)
    }

    /// Loads the built-in presets embedded in the library.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default presets from embedded string...");
        let default_yaml = include_str!("../config/default_presets.yaml");
        let config = Self::from_yaml_str(default_yaml).context("Failed to parse default presets")?;
        debug!("Loaded {} default presets.", config.presets.len());
        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yml::from_str(yaml)?)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yml::to_string(self)?)
    }

    /// The configured default preset, or [`DEFAULT_PRESET`].
    pub fn default_preset(&self) -> &str {
        self.preset.as_deref().filter(|name| !name.is_empty()).unwrap_or(DEFAULT_PRESET)
    }

    /// The step map of a preset, if it exists and is a map.
    pub fn preset(&self, name: &str) -> Option<&StepOptions> {
        self.presets.get(name).and_then(Value::as_object)
    }

    /// Preset names in declaration order.
    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.keys().map(String::as_str).collect()
    }

    /// Full check: preset structure, plus the default preset must exist.
    pub fn validate(&self) -> Result<(), TextGuardError> {
        let mut errors = self.preset_errors();
        let default = self.default_preset();
        if !self.presets.contains_key(default) {
            errors.push(format!("Default preset '{}' is not defined.", default));
        }
        into_result(errors)
    }

    /// Checks that every preset is a map of well-shaped step specs.
    pub fn validate_presets(&self) -> Result<(), TextGuardError> {
        into_result(self.preset_errors())
    }

    fn preset_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, preset) in &self.presets {
            if name.trim().is_empty() {
                errors.push("A preset has an empty name.".to_string());
                continue;
            }
            let Some(steps) = preset.as_object() else {
                errors.push(format!("Preset '{}' must be a map of step names to options.", name));
                continue;
            };
            for (step, spec) in steps {
                if let Err(e) = StepSpec::resolve(step, Some(spec)) {
                    errors.push(format!("Preset '{}': {}", name, e));
                }
            }
        }
        errors
    }
}

fn into_result(errors: Vec<String>) -> Result<(), TextGuardError> {
    if errors.is_empty() {
        return Ok(());
    }
    Err(TextGuardError::InvalidConfig(format!(
        "{} problem(s) found:\n{}",
        errors.len(),
        errors.join("\n")
    )))
}

/// Merges a user configuration over the defaults.
///
/// User presets replace same-named defaults wholesale; new names are
/// appended. The user's default preset name wins when set.
pub fn merge_config(default_config: TextGuardConfig, user_config: Option<TextGuardConfig>) -> TextGuardConfig {
    let mut merged = default_config;
    let Some(user) = user_config else {
        return merged;
    };

    debug!("Merging {} user preset(s) over {} default(s).", user.presets.len(), merged.presets.len());
    for (name, preset) in user.presets {
        if merged.presets.contains_key(&name) {
            debug!("User preset '{}' replaces the built-in one.", name);
        }
        merged.presets.insert(name, preset);
    }
    if let Some(preset) = user.preset.filter(|name| !name.is_empty()) {
        debug!("Overriding default preset with user value: {}", preset);
        merged.preset = Some(preset);
    }
    merged
}

/// Deep-merges per-call overrides onto a preset's step map.
pub fn merge_overrides(base: &StepOptions, overrides: &StepOptions) -> StepOptions {
    let mut merged = base.clone();
    merge_maps(&mut merged, overrides.clone());
    merged
}

/// Merges two values using the policy in the module docs.
pub fn merge_value(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            merge_maps(&mut base, overlay);
            Value::Object(base)
        }
        (Value::Array(mut base), Value::Array(overlay)) => {
            base.extend(overlay);
            Value::Array(base)
        }
        (_, overlay) => overlay,
    }
}

fn merge_maps(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(&key) {
            Some(existing) => {
                let current = existing.take();
                *existing = merge_value(current, value);
            }
            None => {
                base.insert(key, value);
            }
        }
    }
}
