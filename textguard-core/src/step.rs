// textguard-core/src/step.rs
//! Defines the `Step` trait and the configuration shapes a step is built from.
//!
//! A preset maps step names to loosely-typed values. Those values come in
//! several shapes (`true`, a scalar, a map of options), so they are resolved
//! once into a [`StepSpec`] and then handed to the step's constructor as
//! [`StepArgs`]. Nothing about the shape survives past construction: a built
//! step only knows its own typed options.
//!
//! License: MIT OR APACHE 2.0

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::TextGuardError;

/// Raw, per-step options as they appear in a preset.
pub type StepOptions = Map<String, Value>;

/// Reserved key that turns a map spec back into a scalar spec
/// (`{ value: NFKC }` behaves like `NFKC`).
pub const VALUE_KEY: &str = "value";

/// A single text transform.
///
/// Steps are stateless and never fail. Input a step cannot sensibly handle
/// is passed through unchanged.
pub trait Step: Send + Sync + Debug {
    fn transform(&self, text: String) -> String;
}

/// The resolved shape of one preset entry.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSpec {
    /// Absent, `null`, `false`, zero, `""`, `"0"`, or an empty collection.
    Disabled,
    /// `true`: build with the step's defaults.
    Enabled,
    /// A string or number, or a map holding the reserved `value` key.
    Scalar(Value),
    /// Any other map.
    Options(StepOptions),
}

impl StepSpec {
    /// Resolves a raw preset entry. A non-empty list is the only shape that
    /// cannot mean anything and is rejected.
    pub fn resolve(step: &str, raw: Option<&Value>) -> Result<Self, TextGuardError> {
        let Some(raw) = raw else {
            return Ok(StepSpec::Disabled);
        };

        let spec = match raw {
            Value::Null | Value::Bool(false) => StepSpec::Disabled,
            Value::Bool(true) => StepSpec::Enabled,
            Value::Number(n) if n.as_f64() == Some(0.0) => StepSpec::Disabled,
            Value::Number(_) => StepSpec::Scalar(raw.clone()),
            Value::String(s) if s.is_empty() || s == "0" => StepSpec::Disabled,
            Value::String(_) => StepSpec::Scalar(raw.clone()),
            Value::Array(items) if items.is_empty() => StepSpec::Disabled,
            Value::Array(_) => {
                return Err(TextGuardError::step_options(
                    step,
                    "a list is not a valid step configuration, use a map of options",
                ))
            }
            Value::Object(map) if map.is_empty() => StepSpec::Disabled,
            Value::Object(map) => match map.get(VALUE_KEY) {
                Some(value) if !value.is_null() => StepSpec::Scalar(value.clone()),
                _ => StepSpec::Options(map.clone()),
            },
        };
        Ok(spec)
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, StepSpec::Disabled)
    }

    /// Converts the spec into constructor arguments. `None` means the step is
    /// not part of the pipeline.
    pub fn into_args(self) -> Option<StepArgs> {
        match self {
            StepSpec::Disabled => None,
            StepSpec::Enabled => Some(StepArgs::Defaults),
            StepSpec::Scalar(value) => Some(StepArgs::Value(value)),
            StepSpec::Options(map) => Some(StepArgs::Options(map)),
        }
    }
}

/// Arguments passed to a step constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum StepArgs {
    Defaults,
    Value(Value),
    Options(StepOptions),
}

impl StepArgs {
    /// Deserializes the arguments into a step's typed options.
    ///
    /// `T` must use `#[serde(default)]` so missing keys fall back to the
    /// step defaults; unknown keys are ignored. A scalar fills `scalar_key`;
    /// steps without a scalar form pass `None` and reject scalars.
    pub fn parse<T>(self, step: &str, scalar_key: Option<&str>) -> Result<T, TextGuardError>
    where
        T: DeserializeOwned + Default,
    {
        let map = match self {
            StepArgs::Defaults => return Ok(T::default()),
            StepArgs::Options(map) => map,
            StepArgs::Value(value) => {
                let Some(key) = scalar_key else {
                    return Err(TextGuardError::step_options(
                        step,
                        format!("expected a map of options, got the scalar {}", value),
                    ));
                };
                let mut map = Map::new();
                map.insert(key.to_string(), value);
                map
            }
        };

        serde_json::from_value(Value::Object(map))
            .map_err(|e| TextGuardError::step_options(step, e.to_string()))
    }
}
