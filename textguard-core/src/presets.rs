//! presets.rs - Locating preset files and describing presets.
//!
//! Preset files are plain `TextGuardConfig` YAML. They can be named by path
//! or by bare name, in which case a handful of well-known directories are
//! searched in order.
//!
//! License: MIT OR APACHE 2.0

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

use crate::config::TextGuardConfig;
use crate::registry::StepRegistry;
use crate::step::{StepOptions, StepSpec};

/// Paths searched for a config named `name`, most specific first.
pub fn config_candidate_paths(name: &str) -> Vec<PathBuf> {
    let base_dirs = vec![
        dirs::home_dir().map(|p| p.join(".textguard")),
        dirs::config_dir().map(|p| p.join("textguard")),
        Some(PathBuf::from("/etc/textguard")),
        Some(PathBuf::from("./config")),
    ];

    base_dirs
        .into_iter()
        .flatten()
        .map(|dir| dir.join(format!("{}.yaml", name)))
        .collect()
}

/// Loads a config from a file path, or by name from the candidate paths.
pub fn load_config_by_name(name_or_path: &str) -> Result<TextGuardConfig> {
    debug!("Attempting to load config from: '{}'", name_or_path);

    let path_to_load = {
        let path = Path::new(name_or_path);
        if path.is_file() {
            debug!("Input is a valid file path. Loading directly from: {}", path.display());
            Some(path.to_path_buf())
        } else {
            config_candidate_paths(name_or_path).into_iter().find(|p| p.is_file())
        }
    }
    .with_context(|| {
        format!(
            "Config '{}' not found. It is not a valid file path, and was not found in expected locations.",
            name_or_path
        )
    })?;

    TextGuardConfig::load_from_file(&path_to_load)
}

/// Names of the steps a preset switches on, in execution order.
///
/// Entries that cannot be resolved count as enabled, so a broken preset
/// still shows what it asks for; building it reports the error.
pub fn enabled_steps(preset: &StepOptions, registry: &StepRegistry) -> Vec<String> {
    registry
        .iter()
        .filter(|(name, _)| match preset.get(*name) {
            Some(raw) => StepSpec::resolve(name, Some(raw)).map_or(true, |spec| spec.is_enabled()),
            None => false,
        })
        .map(|(name, _)| name.to_string())
        .collect()
}

/// One line of `presets list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub is_default: bool,
    /// Enabled steps in execution order.
    pub steps: Vec<String>,
    /// Keys that name no registered step and are therefore ignored.
    pub ignored: Vec<String>,
}

pub fn summarize_presets(config: &TextGuardConfig, registry: &StepRegistry) -> Vec<PresetSummary> {
    let default = config.default_preset();
    config
        .presets
        .iter()
        .map(|(name, value)| {
            let empty = StepOptions::new();
            let preset = value.as_object().unwrap_or(&empty);
            PresetSummary {
                name: name.clone(),
                is_default: name == default,
                steps: enabled_steps(preset, registry),
                ignored: preset.keys().filter(|key| !registry.contains(key)).cloned().collect(),
            }
        })
        .collect()
}

/// Renders one preset as a standalone YAML document.
pub fn preset_to_yaml(name: &str, preset: &StepOptions) -> Result<String> {
    let mut doc = serde_json::Map::new();
    doc.insert(name.to_string(), serde_json::Value::Object(preset.clone()));
    serde_yml::to_string(&doc).with_context(|| format!("Failed to render preset '{}' as YAML", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidate_paths_end_with_name() {
        let paths = config_candidate_paths("mine");
        assert!(!paths.is_empty());
        assert!(paths.iter().all(|p| p.ends_with("mine.yaml")));
        assert!(paths.contains(&PathBuf::from("/etc/textguard/mine.yaml")));
    }

    #[test]
    fn test_enabled_steps_follow_registry_order() {
        let registry = StepRegistry::with_builtin_steps();
        let preset = json!({
            "trim_whitespace": true,
            "strip_html": false,
            "remove_control_chars": true,
            "custom": true
        });
        assert_eq!(
            enabled_steps(preset.as_object().unwrap(), &registry),
            vec!["remove_control_chars", "trim_whitespace"]
        );
    }

    #[test]
    fn test_summarize_default_presets() {
        let registry = StepRegistry::with_builtin_steps();
        let config = TextGuardConfig::load_default().unwrap();
        let summaries = summarize_presets(&config, &registry);
        assert_eq!(summaries.len(), 5);
        let safe = &summaries[0];
        assert!(safe.is_default);
        assert_eq!(safe.steps.first().map(String::as_str), Some("remove_control_chars"));
        assert_eq!(safe.steps.last().map(String::as_str), Some("visible_ratio_guard"));
        assert!(summaries.iter().all(|s| s.ignored.is_empty()));
    }

    #[test]
    fn test_preset_to_yaml() {
        let config = TextGuardConfig::load_default().unwrap();
        let yaml = preset_to_yaml("username", config.preset("username").unwrap()).unwrap();
        assert!(yaml.starts_with("username:"));
        assert!(yaml.contains("max_repeat: 1"));
    }

    #[test]
    fn test_load_config_by_name_missing() {
        let err = load_config_by_name("definitely-not-a-textguard-config").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
