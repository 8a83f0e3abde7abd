// textguard-core/src/steps/guards.rs
//! Steps that bound accepted content: `visible_ratio_guard` and
//! `truncate_length`.

use serde::Deserialize;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};
use crate::validators::visible_ratio;

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct VisibleRatioGuardOptions {
    pub min_ratio: f64,
}

impl Default for VisibleRatioGuardOptions {
    fn default() -> Self {
        Self { min_ratio: 0.6 }
    }
}

/// Replaces the whole text with `""` when too little of it is visible.
///
/// A rejection is a successful transform. Callers that need to tell a
/// rejected input from one that was cleaned down to nothing should use
/// `TextGuard::validate`.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRatioGuard {
    min_ratio: f64,
}

impl VisibleRatioGuard {
    pub fn new(options: VisibleRatioGuardOptions) -> Result<Self, TextGuardError> {
        if !(0.0..=1.0).contains(&options.min_ratio) {
            return Err(TextGuardError::step_options(
                super::VISIBLE_RATIO_GUARD,
                format!("min_ratio must be between 0 and 1, got {}", options.min_ratio),
            ));
        }
        Ok(Self { min_ratio: options.min_ratio })
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: VisibleRatioGuardOptions = args.parse(super::VISIBLE_RATIO_GUARD, Some("min_ratio"))?;
        Ok(Box::new(Self::new(options)?))
    }

    pub fn min_ratio(&self) -> f64 {
        self.min_ratio
    }
}

impl Step for VisibleRatioGuard {
    fn transform(&self, text: String) -> String {
        if visible_ratio(&text) < self.min_ratio {
            return String::new();
        }
        text
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TruncateLengthOptions {
    pub max: usize,
}

impl Default for TruncateLengthOptions {
    fn default() -> Self {
        Self { max: 5000 }
    }
}

/// Keeps the first `max` codepoints.
#[derive(Debug, Clone, Copy)]
pub struct TruncateLength {
    max: usize,
}

impl TruncateLength {
    pub fn new(options: TruncateLengthOptions) -> Self {
        Self { max: options.max }
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: TruncateLengthOptions = args.parse(super::TRUNCATE_LENGTH, Some("max"))?;
        Ok(Box::new(Self::new(options)))
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Step for TruncateLength {
    fn transform(&self, mut text: String) -> String {
        if let Some((cut, _)) = text.char_indices().nth(self.max) {
            text.truncate(cut);
        }
        text
    }
}
