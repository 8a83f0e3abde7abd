// textguard-core/src/content_log.rs
//! Debug logging of user content.
//!
//! Text passing through a pipeline is untrusted user input and may be
//! personal. Debug logs show only its length unless
//! `TEXTGUARD_ALLOW_DEBUG_CONTENT=true` is set in the environment.

use lazy_static::lazy_static;
use log::debug;

lazy_static! {
    /// Read once; changing the variable later has no effect.
    static ref CONTENT_DEBUG_ALLOWED: bool = {
        std::env::var("TEXTGUARD_ALLOW_DEBUG_CONTENT")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// A length-only placeholder for `text`.
pub fn redact_content(text: &str) -> String {
    format!("[CONTENT: {} chars]", text.chars().count())
}

/// `text` itself when content logging is allowed, otherwise a placeholder.
pub fn loggable_content(text: &str) -> String {
    if *CONTENT_DEBUG_ALLOWED {
        text.to_string()
    } else {
        redact_content(text)
    }
}

/// Logs the input and output of one filter call at debug level.
pub fn log_filter_debug(preset: &str, input: &str, output: &str) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!(
        "Filtered with preset '{}': input={}, output={}",
        preset,
        loggable_content(input),
        loggable_content(output)
    );
}
