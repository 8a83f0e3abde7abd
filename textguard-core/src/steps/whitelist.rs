// textguard-core/src/steps/whitelist.rs
//! The `character_whitelist` step.
//!
//! Word characters, Han ideographs and whitespace are always allowed. The
//! options add Chinese punctuation, ASCII punctuation (less `<`, which could
//! reopen a tag after `strip_html` has run) and up to five emoji
//! blocks to the allow-set; every other codepoint is deleted. The allow-set
//! is compiled once into a negated character class.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

use super::owned_if_changed;

/// Fullwidth and CJK punctuation allowed by `allow_chinese_punctuation`.
const CHINESE_PUNCTUATION: &str = "。、！？：；﹑•＂…‘’“”〝〞¦‖—\u{3000}〈〉﹞﹝「」‹›〖〗】【»«』『〕〔》《\
﹐¸﹕︰﹔¡¿﹖﹌﹏﹋＇´ˊˋ―﹫︳︴¯＿￣﹢﹦﹤‐\u{AD}˜﹟﹩﹠﹪﹡﹨﹍﹉﹎﹊ˇ︵︶︷︸︹︿﹀︺︽︾ˉ﹁﹂﹃﹄︻︼（），";

/// ASCII punctuation allowed by `allow_english_punctuation`. `<` is absent.
const ENGLISH_PUNCTUATION: &str = "`~!@#$%^&*()_+-=[]{}\\|;':\",./>?";

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EmojiRanges {
    /// U+1F600–U+1F64F
    pub emoticons: bool,
    /// U+1F300–U+1F5FF
    pub misc_symbols: bool,
    /// U+1F680–U+1F6FF
    pub transport_map: bool,
    /// U+2600–U+26FF
    pub misc_symbols_2: bool,
    /// U+2700–U+27BF
    pub dingbats: bool,
}

impl Default for EmojiRanges {
    fn default() -> Self {
        Self { emoticons: true, misc_symbols: true, transport_map: true, misc_symbols_2: true, dingbats: true }
    }
}

impl EmojiRanges {
    fn class_ranges(&self) -> String {
        [
            (self.emoticons, r"\x{1F600}-\x{1F64F}"),
            (self.misc_symbols, r"\x{1F300}-\x{1F5FF}"),
            (self.transport_map, r"\x{1F680}-\x{1F6FF}"),
            (self.misc_symbols_2, r"\x{2600}-\x{26FF}"),
            (self.dingbats, r"\x{2700}-\x{27BF}"),
        ]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, range)| *range)
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CharacterWhitelistOptions {
    pub enabled: bool,
    pub allow_emoji: bool,
    pub allow_chinese_punctuation: bool,
    pub allow_english_punctuation: bool,
    pub emoji_ranges: EmojiRanges,
}

impl Default for CharacterWhitelistOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_emoji: true,
            allow_chinese_punctuation: true,
            allow_english_punctuation: true,
            emoji_ranges: EmojiRanges::default(),
        }
    }
}

impl CharacterWhitelistOptions {
    /// Builds the negated class matching every codepoint to delete.
    ///
    /// The pattern is not case-insensitive: every allow class is already
    /// closed under case folding, so `(?i)` would match the same set.
    pub fn blacklist_pattern(&self) -> String {
        let mut pattern = String::from(r"[^\w\p{Han}\s");
        if self.allow_chinese_punctuation {
            for c in CHINESE_PUNCTUATION.chars() {
                pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            }
        }
        if self.allow_english_punctuation {
            for c in ENGLISH_PUNCTUATION.chars() {
                pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            }
        }
        if self.allow_emoji {
            pattern.push_str(&self.emoji_ranges.class_ranges());
        }
        pattern.push(']');
        pattern
    }
}

/// Deletes every codepoint outside the configured allow-set.
#[derive(Debug, Clone)]
pub struct CharacterWhitelist {
    /// `None` when the step is disabled.
    blacklist: Option<Regex>,
}

impl CharacterWhitelist {
    pub fn new(options: CharacterWhitelistOptions) -> Result<Self, TextGuardError> {
        if !options.enabled {
            return Ok(Self { blacklist: None });
        }
        let pattern = options.blacklist_pattern();
        debug!("character_whitelist compiled pattern of {} bytes", pattern.len());
        let blacklist = Regex::new(&pattern)
            .map_err(|e| TextGuardError::step_options(super::CHARACTER_WHITELIST, e.to_string()))?;
        Ok(Self { blacklist: Some(blacklist) })
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: CharacterWhitelistOptions = args.parse(super::CHARACTER_WHITELIST, Some("enabled"))?;
        Ok(Box::new(Self::new(options)?))
    }
}

impl Step for CharacterWhitelist {
    fn transform(&self, text: String) -> String {
        match &self.blacklist {
            Some(blacklist) => owned_if_changed(blacklist.replace_all(&text, "")).unwrap_or(text),
            None => text,
        }
    }
}
