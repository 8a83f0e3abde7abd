// File: textguard-core/src/validators.rs
//! Character classification and content checks shared by the steps and by
//! `TextGuard::validate`.
//!
//! Every length and ratio here is counted in Unicode scalar values, never in
//! bytes, so the numbers line up with `truncate_length.max` and
//! `visible_ratio_guard.min_ratio`.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;

/// Codepoints counted as invisible by the visible-ratio computation: the
/// whole "Other" general category plus the zero-width set.
static INVISIBLE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{C}\x{200B}-\x{200D}\x{FEFF}]").expect("static invisible-char pattern")
});

/// Codepoints in the letter, number, punctuation, symbol and separator
/// categories.
static PRINTABLE_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}\p{P}\p{S}\p{Z}]").expect("static printable-char pattern")
});

/// Returns `true` for the C0 controls and DEL that `remove_control_chars`
/// deletes. Tab, LF and CR are kept.
pub fn is_stripped_control(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'
    )
}

/// Returns `true` for U+200B, U+200C, U+200D and U+FEFF.
pub fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
}

/// The zero-width set plus WORD JOINER (U+2060). Used when reporting rather
/// than removing.
pub fn is_invisible_joiner(c: char) -> bool {
    is_zero_width(c) || c == '\u{2060}'
}

pub fn has_control_chars(text: &str) -> bool {
    text.chars().any(is_stripped_control)
}

pub fn has_zero_width_chars(text: &str) -> bool {
    text.chars().any(is_invisible_joiner)
}

/// Fraction of codepoints that are visible. Empty text is `1.0`.
pub fn visible_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }
    let invisible = INVISIBLE_CHARS.find_iter(text).count();
    (total - invisible) as f64 / total as f64
}

/// Returns `true` when more than `threshold` of the text falls outside the
/// letter, number, punctuation, symbol and separator categories.
///
/// Empty text never has too many invisible characters.
pub fn has_too_many_invisible_chars(text: &str, threshold: f64) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let printable = PRINTABLE_CHARS.find_iter(text).count();
    ((total - printable) as f64 / total as f64) > threshold
}

pub fn is_empty_or_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

/// Guesses the dominant script of a text: `zh`, `en`, `ru` or `ar`.
///
/// Counts CJK unified ideographs, ASCII letters, Cyrillic and Arabic
/// codepoints. Ties go to the earlier language in that list; text with none
/// of them is `en`.
pub fn detect_language(text: &str) -> &'static str {
    let mut counts = [0usize; 4];
    for c in text.chars() {
        match c {
            '\u{4E00}'..='\u{9FFF}' => counts[0] += 1,
            'a'..='z' | 'A'..='Z' => counts[1] += 1,
            '\u{0400}'..='\u{04FF}' => counts[2] += 1,
            '\u{0600}'..='\u{06FF}' => counts[3] += 1,
            _ => {}
        }
    }

    const LANGUAGES: [&str; 4] = ["zh", "en", "ru", "ar"];
    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return "en";
    }
    counts
        .iter()
        .position(|&count| count == max)
        .map(|idx| LANGUAGES[idx])
        .unwrap_or("en")
}

/// Truncates to at most `length` codepoints, ending with `suffix` when the
/// text was cut. The suffix counts towards `length`.
pub fn safe_truncate(text: &str, length: usize, suffix: &str) -> String {
    if text.chars().count() <= length {
        return text.to_string();
    }
    let keep = length.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

/// Trims the ends and collapses every inner whitespace run to one space.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
