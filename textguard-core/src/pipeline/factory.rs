//! factory.rs - Builds pipelines from step-options maps.
//!
//! The factory walks the registry, not the options map, so the registry
//! alone fixes execution order. For every registered step it resolves the
//! matching entry into a [`StepSpec`] and, unless the spec is disabled,
//! calls the step's constructor. The first constructor error aborts the
//! build.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};

use crate::errors::TextGuardError;
use crate::registry::StepRegistry;
use crate::step::{StepOptions, StepSpec};

use super::Pipeline;

/// Builds [`Pipeline`]s against one registry.
#[derive(Debug, Clone, Copy)]
pub struct PipelineFactory<'a> {
    registry: &'a StepRegistry,
}

impl<'a> PipelineFactory<'a> {
    pub fn new(registry: &'a StepRegistry) -> Self {
        Self { registry }
    }

    /// Builds the pipeline for one merged step-options map.
    ///
    /// Entries naming unregistered steps are ignored.
    pub fn build(&self, specs: &StepOptions) -> Result<Pipeline, TextGuardError> {
        for name in specs.keys().filter(|name| !self.registry.contains(name)) {
            debug!("Ignoring unknown step '{}' in configuration.", name);
        }

        let mut steps = Vec::new();
        for (name, constructor) in self.registry.iter() {
            let spec = StepSpec::resolve(name, specs.get(name))?;
            let Some(args) = spec.into_args() else {
                continue;
            };
            let step = (**constructor)(args).map_err(|e| {
                warn!("Failed to build step '{}': {}", name, e);
                e
            })?;
            steps.push((name.to_string(), step));
        }

        debug!(
            "Built pipeline with {} step(s): [{}]",
            steps.len(),
            steps.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>().join(", ")
        );
        Ok(Pipeline::new(steps))
    }
}

/// Shorthand for `PipelineFactory::new(registry).build(specs)`.
pub fn build_pipeline(registry: &StepRegistry, specs: &StepOptions) -> Result<Pipeline, TextGuardError> {
    PipelineFactory::new(registry).build(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps;
    use serde_json::{json, Value};

    fn specs(value: Value) -> StepOptions {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_registry_order_wins_over_map_order() {
        let registry = StepRegistry::with_builtin_steps();
        let pipeline = build_pipeline(
            &registry,
            &specs(json!({"trim_whitespace": true, "collapse_spaces": true, "remove_zero_width": true})),
        )
        .unwrap();
        assert_eq!(
            pipeline.step_names(),
            vec![steps::REMOVE_ZERO_WIDTH, steps::COLLAPSE_SPACES, steps::TRIM_WHITESPACE]
        );
    }

    #[test]
    fn test_disabled_and_unknown_entries_are_skipped() {
        let registry = StepRegistry::with_builtin_steps();
        let pipeline = build_pipeline(
            &registry,
            &specs(json!({
                "trim_whitespace": false,
                "strip_html": null,
                "truncate_length": {},
                "no_such_step": true,
                "collapse_spaces": 1
            })),
        )
        .unwrap();
        assert_eq!(pipeline.step_names(), vec![steps::COLLAPSE_SPACES]);
    }

    #[test]
    fn test_constructor_errors_fail_the_build() {
        let registry = StepRegistry::with_builtin_steps();
        let err = build_pipeline(&registry, &specs(json!({"visible_ratio_guard": {"min_ratio": 2.0}}))).unwrap_err();
        match err {
            TextGuardError::InvalidStepOptions { step, .. } => assert_eq!(step, steps::VISIBLE_RATIO_GUARD),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = build_pipeline(&registry, &specs(json!({"whitelist_html": ["p"]}))).unwrap_err();
        assert!(matches!(err, TextGuardError::InvalidStepOptions { .. }));
    }

    #[test]
    fn test_scalar_and_value_marker_shapes() {
        let registry = StepRegistry::with_builtin_steps();
        let a = build_pipeline(&registry, &specs(json!({"truncate_length": 5}))).unwrap();
        let b = build_pipeline(&registry, &specs(json!({"truncate_length": {"value": 5}}))).unwrap();
        let c = build_pipeline(&registry, &specs(json!({"truncate_length": {"max": 5}}))).unwrap();
        for pipeline in [a, b, c] {
            assert_eq!(pipeline.run("abcdefgh"), "abcde");
        }
    }
}
