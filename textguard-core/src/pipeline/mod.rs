//! Pipelines: built, ordered step sequences and the machinery that builds
//! and caches them.
//!
//! * `factory`: turns a step-options map into a [`Pipeline`] using a
//!   [`StepRegistry`](crate::registry::StepRegistry).
//! * `cache`: keeps built pipelines keyed by a fingerprint of their
//!   configuration.
//!
//! License: MIT OR APACHE 2.0

pub mod cache;
pub mod factory;

use serde::Serialize;

use crate::step::Step;

pub use cache::{fingerprint, PipelineCache, DEFAULT_CACHE_CAPACITY};
pub use factory::{build_pipeline, PipelineFactory};

/// The text as it left one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepTrace {
    pub step: String,
    pub output: String,
}

/// An ordered sequence of constructed steps.
///
/// Immutable once built; share it behind an `Arc` to reuse it across
/// threads.
#[derive(Debug, Default)]
pub struct Pipeline {
    steps: Vec<(String, Box<dyn Step>)>,
}

impl Pipeline {
    pub fn new(steps: Vec<(String, Box<dyn Step>)>) -> Self {
        Self { steps }
    }

    /// Runs every step left to right. No step is skipped, including after
    /// a step has emptied the text.
    pub fn run(&self, text: impl Into<String>) -> String {
        self.steps.iter().fold(text.into(), |text, (_, step)| step.transform(text))
    }

    /// Like [`Pipeline::run`], recording the text after each step.
    pub fn trace(&self, text: impl Into<String>) -> Vec<StepTrace> {
        let mut text = text.into();
        let mut traces = Vec::with_capacity(self.steps.len());
        for (name, step) in &self.steps {
            text = step.transform(text);
            traces.push(StepTrace { step: name.clone(), output: text.clone() });
        }
        traces
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
