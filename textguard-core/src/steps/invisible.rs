// textguard-core/src/steps/invisible.rs
//! Steps that delete invisible codepoints: `remove_control_chars` and
//! `remove_zero_width`.

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};
use crate::validators::{is_stripped_control, is_zero_width};

/// Deletes U+0000–U+0008, U+000B, U+000C, U+000E–U+001F and U+007F.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveControlChars;

impl RemoveControlChars {
    pub fn from_args(_args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        Ok(Box::new(RemoveControlChars))
    }
}

impl Step for RemoveControlChars {
    fn transform(&self, mut text: String) -> String {
        text.retain(|c| !is_stripped_control(c));
        text
    }
}

/// Deletes U+200B, U+200C, U+200D and U+FEFF.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveZeroWidth;

impl RemoveZeroWidth {
    pub fn from_args(_args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        Ok(Box::new(RemoveZeroWidth))
    }
}

impl Step for RemoveZeroWidth {
    fn transform(&self, mut text: String) -> String {
        text.retain(|c| !is_zero_width(c));
        text
    }
}
