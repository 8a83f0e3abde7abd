//! guard.rs - The `TextGuard` entry point.
//!
//! `TextGuard` owns the preset table, the step registry and a cache of
//! built pipelines. Everything a caller does goes through it: filtering,
//! validation and the administrative calls that add steps or presets.
//!
//! Mutation needs `&mut self`. Set a guard up completely, then share it
//! (for example behind an `Arc`) for concurrent filtering.
//!
//! License: MIT OR APACHE 2.0

use std::sync::Arc;

use log::debug;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::{merge_overrides, TextGuardConfig};
use crate::content_log::log_filter_debug;
use crate::errors::TextGuardError;
use crate::pipeline::{build_pipeline, Pipeline, PipelineCache};
use crate::registry::StepRegistry;
use crate::step::{Step, StepArgs, StepOptions, StepSpec};
use crate::steps::{
    self, TruncateLength, TruncateLengthOptions, VisibleRatioGuard, VisibleRatioGuardOptions,
};
use crate::validators::{has_control_chars, has_zero_width_chars, visible_ratio};

/// Outcome of [`TextGuard::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Human-readable reasons, empty when `valid`.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self { valid: errors.is_empty(), errors }
    }
}

#[derive(Debug)]
pub struct TextGuard {
    config: TextGuardConfig,
    registry: StepRegistry,
    cache: PipelineCache,
}

impl TextGuard {
    /// Creates a guard after validating `config`.
    pub fn new(config: TextGuardConfig, registry: StepRegistry) -> Result<Self, TextGuardError> {
        config.validate()?;
        debug!(
            "TextGuard ready with {} preset(s) and {} registered step(s).",
            config.presets.len(),
            registry.len()
        );
        Ok(Self { config, registry, cache: PipelineCache::new() })
    }

    /// The built-in presets and steps.
    pub fn with_defaults() -> Result<Self, TextGuardError> {
        Self::new(TextGuardConfig::load_default()?, StepRegistry::with_builtin_steps())
    }

    pub fn config(&self) -> &TextGuardConfig {
        &self.config
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn default_preset(&self) -> &str {
        self.config.default_preset()
    }

    /// The merged step map for a preset, or `None` if the preset is unknown.
    fn merged_specs(&self, preset: &str, overrides: Option<&StepOptions>) -> Option<StepOptions> {
        let base = self.config.preset(preset)?;
        Some(match overrides {
            Some(overrides) if !overrides.is_empty() => merge_overrides(base, overrides),
            _ => base.clone(),
        })
    }

    /// The (cached) pipeline for a preset with optional overrides.
    pub fn pipeline_for(
        &self,
        preset: Option<&str>,
        overrides: Option<&StepOptions>,
    ) -> Result<Arc<Pipeline>, TextGuardError> {
        let name = preset.unwrap_or_else(|| self.default_preset());
        let specs = self
            .merged_specs(name, overrides)
            .ok_or_else(|| TextGuardError::UnknownPreset(name.to_string()))?;
        self.cache.get_or_build(&specs, |specs| build_pipeline(&self.registry, specs))
    }

    /// Runs `text` through a preset. Content rejection yields `Ok("")`.
    pub fn filter(
        &self,
        text: &str,
        preset: Option<&str>,
        overrides: Option<&StepOptions>,
    ) -> Result<String, TextGuardError> {
        let pipeline = self.pipeline_for(preset, overrides)?;
        let output = pipeline.run(text);
        log_filter_debug(preset.unwrap_or_else(|| self.default_preset()), text, &output);
        Ok(output)
    }

    /// Filters many texts with one pipeline.
    pub fn filter_batch<I, S>(
        &self,
        texts: I,
        preset: Option<&str>,
        overrides: Option<&StepOptions>,
    ) -> Result<Vec<String>, TextGuardError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pipeline = self.pipeline_for(preset, overrides)?;
        Ok(texts.into_iter().map(|text| pipeline.run(text)).collect())
    }

    /// Checks `text` against a preset without transforming it.
    ///
    /// Reports a low visible ratio, excess length, control characters and
    /// zero-width characters, each only when the matching step is enabled
    /// in the merged preset. An unknown preset is reported in the result,
    /// not as an error; malformed step options are an error.
    pub fn validate(
        &self,
        text: &str,
        preset: Option<&str>,
        overrides: Option<&StepOptions>,
    ) -> Result<ValidationReport, TextGuardError> {
        let name = preset.unwrap_or_else(|| self.default_preset());
        let Some(specs) = self.merged_specs(name, overrides) else {
            return Ok(ValidationReport::from_errors(vec![format!("Preset '{}' not found", name)]));
        };

        let mut errors = Vec::new();

        if let Some(args) = step_args(&specs, steps::VISIBLE_RATIO_GUARD)? {
            let options: VisibleRatioGuardOptions = args.parse(steps::VISIBLE_RATIO_GUARD, Some("min_ratio"))?;
            let min_ratio = VisibleRatioGuard::new(options)?.min_ratio();
            let ratio = visible_ratio(text);
            if ratio < min_ratio {
                errors.push(format!(
                    "Visible character ratio ({:.2}) is below minimum required ({})",
                    ratio, min_ratio
                ));
            }
        }

        if let Some(args) = step_args(&specs, steps::TRUNCATE_LENGTH)? {
            let options: TruncateLengthOptions = args.parse(steps::TRUNCATE_LENGTH, Some("max"))?;
            let max = TruncateLength::new(options).max();
            let length = text.chars().count();
            if length > max {
                errors.push(format!("Text length ({}) exceeds maximum allowed ({})", length, max));
            }
        }

        if step_args(&specs, steps::REMOVE_CONTROL_CHARS)?.is_some() && has_control_chars(text) {
            errors.push("Text contains control characters".to_string());
        }

        if step_args(&specs, steps::REMOVE_ZERO_WIDTH)?.is_some() && has_zero_width_chars(text) {
            errors.push("Text contains zero-width characters".to_string());
        }

        debug!("Validated against preset '{}': {} problem(s).", name, errors.len());
        Ok(ValidationReport::from_errors(errors))
    }

    /// Registers a step, or replaces the constructor of an existing one.
    /// Cached pipelines are dropped.
    pub fn register_step<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(StepArgs) -> Result<Box<dyn Step>, TextGuardError> + Send + Sync + 'static,
    {
        self.registry.register(name, constructor);
        self.cache.clear();
    }

    /// Adds or replaces a preset. Cached pipelines are dropped.
    pub fn add_preset(&mut self, name: impl Into<String>, preset: StepOptions) -> Result<(), TextGuardError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TextGuardError::InvalidConfig("preset name must not be empty".to_string()));
        }
        for (step, spec) in &preset {
            StepSpec::resolve(step, Some(spec))?;
        }
        debug!("Adding preset '{}' with {} entr(ies).", name, preset.len());
        self.config.presets.insert(name, serde_json::Value::Object(preset));
        self.cache.clear();
        Ok(())
    }

    /// Registered step names in execution order.
    pub fn list_steps(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn list_presets(&self) -> Vec<&str> {
        self.config.preset_names()
    }

    pub fn preset_config(&self, name: &str) -> Option<&StepOptions> {
        self.config.preset(name)
    }
}

fn step_args(specs: &StepOptions, step: &str) -> Result<Option<StepArgs>, TextGuardError> {
    Ok(StepSpec::resolve(step, specs.get(step))?.into_args())
}

static DEFAULT_GUARD: OnceCell<TextGuard> = OnceCell::new();

/// One-shot filtering with the built-in presets and steps.
///
/// The default guard is built on first use and shared afterwards.
pub fn filter_text(text: &str, preset: Option<&str>) -> Result<String, TextGuardError> {
    let guard = DEFAULT_GUARD.get_or_try_init(TextGuard::with_defaults)?;
    guard.filter(text, preset, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::pipeline::DEFAULT_CACHE_CAPACITY;

    fn map(value: serde_json::Value) -> StepOptions {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_filter_with_default_preset() {
        let guard = TextGuard::with_defaults().unwrap();
        assert_eq!(guard.filter("  Hello   <b>World</b>\u{200B} ", None, None).unwrap(), "Hello World");
    }

    #[test]
    fn test_filter_unknown_preset_is_an_error() {
        let guard = TextGuard::with_defaults().unwrap();
        let err = guard.filter("x", Some("ghost"), None).unwrap_err();
        assert!(matches!(err, TextGuardError::UnknownPreset(ref name) if name == "ghost"));
    }

    #[test]
    fn test_filter_with_overrides() {
        let guard = TextGuard::with_defaults().unwrap();
        let overrides = map(json!({"truncate_length": {"max": 5}}));
        assert_eq!(guard.filter("abcdefgh", Some("safe"), Some(&overrides)).unwrap(), "abcde");

        let disable = map(json!({"strip_html": null}));
        assert_eq!(guard.filter("<b>x</b>", None, Some(&disable)).unwrap(), "<b>x</b>");
    }

    #[test]
    fn test_pipelines_are_cached() {
        let guard = TextGuard::with_defaults().unwrap();
        let a = guard.pipeline_for(Some("strict"), None).unwrap();
        let b = guard.pipeline_for(Some("strict"), None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_request_overrides_do_not_grow_the_cache() {
        let guard = TextGuard::with_defaults().unwrap();
        for max in 1..500 {
            let overrides = map(json!({"truncate_length": max}));
            let out = guard.filter("abcdefgh", Some("safe"), Some(&overrides)).unwrap();
            assert_eq!(out.chars().count(), max.min(8));
        }
        assert_eq!(guard.cache.len(), DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_validate_ratio_agrees_with_filter() {
        let guard = TextGuard::with_defaults().unwrap();
        // Bidi marks are format characters, not C0 controls or zero-width.
        let text = "a\u{200E}\u{200E}\u{200E}";
        assert_eq!(guard.filter(text, Some("safe"), None).unwrap(), "");
        let report = guard.validate(text, Some("safe"), None).unwrap();
        assert_eq!(
            report.errors,
            vec!["Visible character ratio (0.25) is below minimum required (0.6)".to_string()]
        );

        assert!(guard.validate("abc", Some("safe"), None).unwrap().valid);
        assert_eq!(guard.filter("abc", Some("safe"), None).unwrap(), "abc");
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let guard = TextGuard::with_defaults().unwrap();
        let report = guard
            .validate("ab\u{1}\u{200B}\u{200B}", Some("username"), Some(&map(json!({"truncate_length": 3}))))
            .unwrap();
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "Visible character ratio (0.40) is below minimum required (0.9)".to_string(),
                "Text length (5) exceeds maximum allowed (3)".to_string(),
                "Text contains control characters".to_string(),
                "Text contains zero-width characters".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_clean_text_and_unknown_preset() {
        let guard = TextGuard::with_defaults().unwrap();
        let ok = guard.validate("Hello World", None, None).unwrap();
        assert_eq!(ok, ValidationReport { valid: true, errors: vec![] });

        let missing = guard.validate("Hello", Some("ghost"), None).unwrap();
        assert_eq!(missing.errors, vec!["Preset 'ghost' not found".to_string()]);
        assert!(!missing.valid);
    }

    #[test]
    fn test_validate_only_checks_enabled_steps() {
        let mut guard = TextGuard::with_defaults().unwrap();
        guard.add_preset("bare", map(json!({"trim_whitespace": true}))).unwrap();
        let report = guard.validate("\u{1}\u{200B}", Some("bare"), None).unwrap();
        assert!(report.valid);
    }

    #[test]
    fn test_validate_rejects_malformed_options() {
        let guard = TextGuard::with_defaults().unwrap();
        let overrides = map(json!({"visible_ratio_guard": {"min_ratio": 3}}));
        assert!(guard.validate("x", None, Some(&overrides)).is_err());
    }

    #[test]
    fn test_register_step_invalidates_cache() {
        #[derive(Debug)]
        struct Shout;
        impl Step for Shout {
            fn transform(&self, text: String) -> String {
                text.to_uppercase()
            }
        }

        let mut guard = TextGuard::with_defaults().unwrap();
        guard.add_preset("loud", map(json!({"shout": true, "trim_whitespace": true}))).unwrap();
        assert_eq!(guard.filter(" hi ", Some("loud"), None).unwrap(), "hi");

        guard.register_step("shout", |_args| Ok(Box::new(Shout) as Box<dyn Step>));
        assert_eq!(guard.filter(" hi ", Some("loud"), None).unwrap(), "HI");
        assert_eq!(guard.list_steps().last().map(String::as_str), Some("shout"));
    }

    #[test]
    fn test_admin_surface() {
        let mut guard = TextGuard::with_defaults().unwrap();
        assert_eq!(guard.default_preset(), "safe");
        assert!(guard.list_presets().contains(&"rich_text"));
        assert!(guard.preset_config("ghost").is_none());
        assert!(guard.add_preset("", StepOptions::new()).is_err());
        assert!(guard.add_preset("bad", map(json!({"strip_html": ["x"]}))).is_err());
    }

    #[test]
    fn test_filter_text_and_batch() {
        assert_eq!(filter_text("  a  b ", None).unwrap(), "a b");
        let guard = TextGuard::with_defaults().unwrap();
        let out = guard.filter_batch(vec![" a ", "<i>b</i>"], None, None).unwrap();
        assert_eq!(out, vec!["a".to_string(), "b".to_string()]);
    }
}
