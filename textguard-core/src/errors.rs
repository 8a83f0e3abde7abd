//! errors.rs - Custom error types for the textguard-core library.
//!
//! Configuration problems (unknown presets, malformed step options, invalid
//! config files) are the only failures the library reports. Steps themselves
//! never fail at run time.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// All error types surfaced by `textguard-core`.
///
/// `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TextGuardError {
    #[error("Preset '{0}' not found")]
    UnknownPreset(String),

    #[error("Invalid options for step '{step}': {reason}")]
    InvalidStepOptions { step: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl TextGuardError {
    /// Shorthand for an `InvalidStepOptions` error.
    pub fn step_options(step: &str, reason: impl Into<String>) -> Self {
        TextGuardError::InvalidStepOptions {
            step: step.to_string(),
            reason: reason.into(),
        }
    }
}
