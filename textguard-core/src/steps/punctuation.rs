// textguard-core/src/steps/punctuation.rs
//! Punctuation steps: `normalize_punctuations` and `collapse_repeated_marks`.

use serde::Deserialize;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

/// CJK forms folded to Western forms under the `en` locale.
const TO_WESTERN: &[(char, char)] = &[
    ('，', ','),
    ('。', '.'),
    ('？', '?'),
    ('！', '!'),
    ('：', ':'),
    ('；', ';'),
    ('“', '"'),
    ('”', '"'),
    ('‘', '\''),
    ('’', '\''),
    ('＂', '"'),
    ('＇', '\''),
    ('（', '('),
    ('）', ')'),
    ('【', '['),
    ('】', ']'),
    ('《', '<'),
    ('》', '>'),
];

/// Western forms widened to CJK forms under the `zh` locale.
const TO_CJK: &[(char, char)] = &[
    (',', '，'),
    ('.', '。'),
    ('?', '？'),
    ('!', '！'),
    (':', '：'),
    (';', '；'),
    ('"', '＂'),
    ('\'', '＇'),
    ('(', '（'),
    (')', '）'),
    ('[', '【'),
    (']', '】'),
    ('<', '《'),
    ('>', '》'),
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizePunctuationsOptions {
    pub locale: Option<String>,
}

impl Default for NormalizePunctuationsOptions {
    fn default() -> Self {
        Self { locale: Some("zh".to_string()) }
    }
}

/// Rewrites punctuation to the forms used by one locale.
#[derive(Debug, Clone)]
pub struct NormalizePunctuations {
    table: &'static [(char, char)],
}

impl NormalizePunctuations {
    pub fn new(options: NormalizePunctuationsOptions) -> Result<Self, TextGuardError> {
        let table = match options.locale.as_deref() {
            None => &[][..],
            Some("en") => TO_WESTERN,
            Some("zh") => TO_CJK,
            Some(other) => {
                return Err(TextGuardError::step_options(
                    super::NORMALIZE_PUNCTUATIONS,
                    format!("unsupported locale '{}', expected 'en' or 'zh'", other),
                ))
            }
        };
        Ok(Self { table })
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: NormalizePunctuationsOptions = args.parse(super::NORMALIZE_PUNCTUATIONS, Some("locale"))?;
        Ok(Box::new(Self::new(options)?))
    }

    fn map(&self, c: char) -> Option<char> {
        self.table.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
    }
}

impl Step for NormalizePunctuations {
    fn transform(&self, text: String) -> String {
        if self.table.is_empty() || !text.chars().any(|c| self.map(c).is_some()) {
            return text;
        }
        text.chars().map(|c| self.map(c).unwrap_or(c)).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollapseRepeatedMarksOptions {
    pub max_repeat: usize,
    pub charset: String,
}

impl Default for CollapseRepeatedMarksOptions {
    fn default() -> Self {
        Self { max_repeat: 2, charset: "!?。，、…—".to_string() }
    }
}

/// Caps runs of the same mark at `max_repeat` occurrences.
#[derive(Debug, Clone)]
pub struct CollapseRepeatedMarks {
    max_repeat: usize,
    charset: Vec<char>,
}

impl CollapseRepeatedMarks {
    pub fn new(options: CollapseRepeatedMarksOptions) -> Result<Self, TextGuardError> {
        if options.max_repeat < 1 {
            return Err(TextGuardError::step_options(
                super::COLLAPSE_REPEATED_MARKS,
                "max_repeat must be at least 1",
            ));
        }
        Ok(Self { max_repeat: options.max_repeat, charset: options.charset.chars().collect() })
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: CollapseRepeatedMarksOptions =
            args.parse(super::COLLAPSE_REPEATED_MARKS, Some("max_repeat"))?;
        Ok(Box::new(Self::new(options)?))
    }
}

impl Step for CollapseRepeatedMarks {
    fn transform(&self, text: String) -> String {
        if self.charset.is_empty() {
            return text;
        }

        let mut out = String::with_capacity(text.len());
        let mut previous: Option<char> = None;
        let mut run = 0usize;
        for c in text.chars() {
            if previous == Some(c) {
                run += 1;
            } else {
                previous = Some(c);
                run = 1;
            }
            if run > self.max_repeat && self.charset.contains(&c) {
                continue;
            }
            out.push(c);
        }
        out
    }
}
