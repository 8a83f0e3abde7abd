// textguard-core/src/lib.rs
//! # TextGuard Core Library
//!
//! `textguard-core` sanitizes untrusted, human-entered text (nicknames, bios,
//! comments, rich-text fields) by running it through an ordered sequence of
//! small, stateless steps. Which steps run, and with which options, is
//! declared per use case in named presets.
//!
//! ## Modules
//!
//! * `step`: the `Step` trait and the shapes a step can be configured with.
//! * `steps`: the built-in step library.
//! * `registry`: the ordered table of step constructors.
//! * `pipeline`: built pipelines, the factory that builds them and a cache.
//! * `config`: preset tables, YAML loading and the override merge.
//! * `presets`: locating config files and describing presets.
//! * `guard`: `TextGuard`, the entry point tying the above together.
//! * `validators`: character classification and text checks.
//! * `content_log`: debug logging that keeps user text out of logs.
//! * `errors`: the `TextGuardError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use textguard_core::TextGuard;
//! use serde_json::json;
//!
//! fn main() -> Result<(), textguard_core::TextGuardError> {
//!     let guard = TextGuard::with_defaults()?;
//!
//!     // The default preset ("safe") strips tags and invisible characters.
//!     let clean = guard.filter("  Hello <b>World</b>\u{200B} ", None, None)?;
//!     assert_eq!(clean, "Hello World");
//!
//!     // Presets fold fullwidth forms and punctuation.
//!     let name = guard.filter("ＵｓｅｒＮａｍｅ１２３", Some("username"), None)?;
//!     assert_eq!(name, "UserName123");
//!
//!     // Overrides are deep-merged onto the preset for one call.
//!     let overrides = json!({"truncate_length": {"max": 5}});
//!     let short = guard.filter("abcdefgh", None, overrides.as_object())?;
//!     assert_eq!(short, "abcde");
//!
//!     // Validation reports problems instead of cleaning them up.
//!     let report = guard.validate("bad\u{0}input", None, None)?;
//!     assert!(!report.valid);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Only configuration problems are errors: an unknown preset passed to
//! `filter`, or step options a step refuses to be built with. Steps never
//! fail. A text rejected by `visible_ratio_guard` comes back as `""`.
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod content_log;
pub mod errors;
pub mod guard;
pub mod pipeline;
pub mod presets;
pub mod registry;
pub mod step;
pub mod steps;
pub mod validators;

/// Configuration types and the merge functions.
pub use config::{merge_config, merge_overrides, merge_value, TextGuardConfig, DEFAULT_PRESET};

pub use errors::TextGuardError;

/// The main entry point and its validation result.
pub use guard::{filter_text, TextGuard, ValidationReport};

pub use pipeline::{build_pipeline, Pipeline, PipelineFactory, StepTrace};

pub use presets::{config_candidate_paths, load_config_by_name, summarize_presets, PresetSummary};

pub use registry::{StepConstructor, StepRegistry};

/// The step abstraction, for implementing custom steps.
pub use step::{Step, StepArgs, StepOptions, StepSpec};
