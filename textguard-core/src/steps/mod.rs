//! The built-in step library.
//!
//! Each submodule holds one family of steps. Every step type exposes a
//! `from_args` constructor with the same signature, so the registry can
//! store them uniformly; steps with options also expose `new(options)` for
//! direct use.
//!
//! [`BUILTIN_STEPS`] fixes the execution order of the built-in steps. The
//! order matters: entity decoding runs before tag stripping, invisible
//! characters go before any whitespace handling, and every step that can
//! produce `<` or `>` (Unicode normalization, fullwidth folding, punctuation
//! normalization) runs before tag stripping. No step after tag stripping
//! emits `<`. The visible-ratio gate runs last.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

pub mod guards;
pub mod html;
pub mod invisible;
pub mod punctuation;
pub mod unicode;
pub mod whitelist;
pub mod whitespace;

pub use guards::{TruncateLength, TruncateLengthOptions, VisibleRatioGuard, VisibleRatioGuardOptions};
pub use html::{HtmlDecode, HtmlDecodeOptions, StripHtml, WhitelistHtml, WhitelistHtmlOptions};
pub use invisible::{RemoveControlChars, RemoveZeroWidth};
pub use punctuation::{
    CollapseRepeatedMarks, CollapseRepeatedMarksOptions, NormalizePunctuations, NormalizePunctuationsOptions,
};
pub use unicode::{FullwidthToHalfwidth, FullwidthToHalfwidthOptions, NormalizeUnicode, NormalizeUnicodeOptions};
pub use whitelist::{CharacterWhitelist, CharacterWhitelistOptions, EmojiRanges};
pub use whitespace::{CollapseSpaces, TrimWhitespace};

pub const HTML_DECODE: &str = "html_decode";
pub const REMOVE_CONTROL_CHARS: &str = "remove_control_chars";
pub const REMOVE_ZERO_WIDTH: &str = "remove_zero_width";
pub const UNICODE_NORMALIZATION: &str = "unicode_normalization";
pub const FULLWIDTH_TO_HALFWIDTH: &str = "fullwidth_to_halfwidth";
pub const NORMALIZE_PUNCTUATIONS: &str = "normalize_punctuations";
pub const STRIP_HTML: &str = "strip_html";
pub const WHITELIST_HTML: &str = "whitelist_html";
pub const CHARACTER_WHITELIST: &str = "character_whitelist";
pub const COLLAPSE_REPEATED_MARKS: &str = "collapse_repeated_marks";
pub const TRUNCATE_LENGTH: &str = "truncate_length";
pub const COLLAPSE_SPACES: &str = "collapse_spaces";
pub const TRIM_WHITESPACE: &str = "trim_whitespace";
pub const VISIBLE_RATIO_GUARD: &str = "visible_ratio_guard";

/// Signature shared by every built-in step constructor.
pub type BuiltinConstructor = fn(StepArgs) -> Result<Box<dyn Step>, TextGuardError>;

/// Built-in steps in execution order.
pub const BUILTIN_STEPS: [(&str, BuiltinConstructor); 14] = [
    (HTML_DECODE, HtmlDecode::from_args),
    (REMOVE_CONTROL_CHARS, RemoveControlChars::from_args),
    (REMOVE_ZERO_WIDTH, RemoveZeroWidth::from_args),
    (UNICODE_NORMALIZATION, NormalizeUnicode::from_args),
    (FULLWIDTH_TO_HALFWIDTH, FullwidthToHalfwidth::from_args),
    (NORMALIZE_PUNCTUATIONS, NormalizePunctuations::from_args),
    (STRIP_HTML, StripHtml::from_args),
    (WHITELIST_HTML, WhitelistHtml::from_args),
    (CHARACTER_WHITELIST, CharacterWhitelist::from_args),
    (COLLAPSE_REPEATED_MARKS, CollapseRepeatedMarks::from_args),
    (TRUNCATE_LENGTH, TruncateLength::from_args),
    (COLLAPSE_SPACES, CollapseSpaces::from_args),
    (TRIM_WHITESPACE, TrimWhitespace::from_args),
    (VISIBLE_RATIO_GUARD, VisibleRatioGuard::from_args),
];

/// `Some` only when a `Cow`-returning transform actually allocated, so the
/// caller can hand back its original `String` otherwise.
pub(crate) fn owned_if_changed(result: Cow<'_, str>) -> Option<String> {
    match result {
        Cow::Borrowed(_) => None,
        Cow::Owned(s) => Some(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<&str> = BUILTIN_STEPS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BUILTIN_STEPS.len());
    }

    #[test]
    fn test_every_builtin_step_is_a_noop_on_empty_text() {
        for (name, constructor) in BUILTIN_STEPS {
            let step = constructor(StepArgs::Defaults)
                .unwrap_or_else(|e| panic!("{} failed to build with defaults: {}", name, e));
            assert_eq!(step.transform(String::new()), "", "{} changed empty text", name);
        }
    }

    #[test]
    fn test_bracket_producing_steps_run_before_tag_stripping() {
        let position = |wanted: &str| BUILTIN_STEPS.iter().position(|(name, _)| *name == wanted).unwrap();
        let strip = position(STRIP_HTML);
        for name in [HTML_DECODE, UNICODE_NORMALIZATION, FULLWIDTH_TO_HALFWIDTH, NORMALIZE_PUNCTUATIONS] {
            assert!(position(name) < strip, "{} runs after {}", name, STRIP_HTML);
        }
        assert!(position(WHITELIST_HTML) > strip);
        assert!(position(CHARACTER_WHITELIST) > strip);
    }
}
