//! registry.rs - The ordered table of step constructors.
//!
//! The registry decides two things: which step names can ever run, and in
//! which order. Presets only switch registered steps on and off. A name
//! that is in a preset but not in the registry never executes.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};
use crate::steps::BUILTIN_STEPS;

/// Builds a step from resolved arguments. Construction is where malformed
/// options are rejected.
pub type StepConstructor = Arc<dyn Fn(StepArgs) -> Result<Box<dyn Step>, TextGuardError> + Send + Sync>;

/// An ordered mapping from step name to constructor.
#[derive(Clone, Default)]
pub struct StepRegistry {
    entries: Vec<(String, StepConstructor)>,
}

impl StepRegistry {
    /// A registry with no steps. Every pipeline built from it is empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The fourteen built-in steps in their execution order.
    pub fn with_builtin_steps() -> Self {
        let mut registry = Self::empty();
        for (name, constructor) in BUILTIN_STEPS {
            registry.register(name, constructor);
        }
        registry
    }

    /// Adds a step at the end of the execution order, or replaces the
    /// constructor of an already registered name in place.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(StepArgs) -> Result<Box<dyn Step>, TextGuardError> + Send + Sync + 'static,
    {
        let name = name.into();
        let constructor: StepConstructor = Arc::new(constructor);
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                debug!("Replacing constructor for step '{}'.", name);
                entry.1 = constructor;
            }
            None => {
                debug!("Registering step '{}' at position {}.", name, self.entries.len());
                self.entries.push((name, constructor));
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    /// Step names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepConstructor)> {
        self.entries.iter().map(|(name, constructor)| (name.as_str(), constructor))
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepRegistry").field("steps", &self.names()).finish()
    }
}
