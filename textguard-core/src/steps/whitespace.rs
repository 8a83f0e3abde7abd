// textguard-core/src/steps/whitespace.rs
//! Whitespace steps: `trim_whitespace` and `collapse_spaces`.

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

/// Removes leading and trailing whitespace, ideographic space (U+3000)
/// included.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimWhitespace;

impl TrimWhitespace {
    pub fn from_args(_args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        Ok(Box::new(TrimWhitespace))
    }
}

impl Step for TrimWhitespace {
    fn transform(&self, text: String) -> String {
        // `char::is_whitespace` covers U+3000.
        let trimmed = text.trim();
        if trimmed.len() == text.len() {
            return text;
        }
        trimmed.to_string()
    }
}

/// Replaces every run of whitespace with a single ASCII space.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseSpaces;

impl CollapseSpaces {
    pub fn from_args(_args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        Ok(Box::new(CollapseSpaces))
    }
}

impl Step for CollapseSpaces {
    fn transform(&self, text: String) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_run = false;
        for c in text.chars() {
            if c.is_whitespace() {
                if !in_run {
                    out.push(' ');
                    in_run = true;
                }
            } else {
                out.push(c);
                in_run = false;
            }
        }
        out
    }
}
