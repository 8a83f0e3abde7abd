// textguard-core/src/steps/unicode.rs
//! Unicode folding steps: `unicode_normalization` and `fullwidth_to_halfwidth`.

use serde::Deserialize;
use unicode_normalization::{
    is_nfc_quick, is_nfd_quick, is_nfkc_quick, is_nfkd_quick, IsNormalized, UnicodeNormalization,
};

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

/// One of the four Unicode normalization forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl NormalizationForm {
    /// Parses `NFC`, `NFD`, `NFKC` or `NFKD`, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "NFC" => Some(Self::Nfc),
            "NFD" => Some(Self::Nfd),
            "NFKC" => Some(Self::Nfkc),
            "NFKD" => Some(Self::Nfkd),
            _ => None,
        }
    }

    fn is_normalized(self, text: &str) -> bool {
        let quick = match self {
            Self::Nfc => is_nfc_quick(text.chars()),
            Self::Nfd => is_nfd_quick(text.chars()),
            Self::Nfkc => is_nfkc_quick(text.chars()),
            Self::Nfkd => is_nfkd_quick(text.chars()),
        };
        quick == IsNormalized::Yes
    }

    fn apply(self, text: &str) -> String {
        match self {
            Self::Nfc => text.nfc().collect(),
            Self::Nfd => text.nfd().collect(),
            Self::Nfkc => text.nfkc().collect(),
            Self::Nfkd => text.nfkd().collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeUnicodeOptions {
    /// `None` turns the step into a pass-through.
    pub form: Option<String>,
}

impl Default for NormalizeUnicodeOptions {
    fn default() -> Self {
        Self { form: Some("NFKC".to_string()) }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizeUnicode {
    form: Option<NormalizationForm>,
}

impl NormalizeUnicode {
    pub fn new(options: NormalizeUnicodeOptions) -> Result<Self, TextGuardError> {
        let form = match options.form.as_deref() {
            None => None,
            Some(name) => Some(NormalizationForm::parse(name).ok_or_else(|| {
                TextGuardError::step_options(
                    super::UNICODE_NORMALIZATION,
                    format!("unknown normalization form '{}', expected NFC, NFD, NFKC or NFKD", name),
                )
            })?),
        };
        Ok(Self { form })
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: NormalizeUnicodeOptions = args.parse(super::UNICODE_NORMALIZATION, Some("form"))?;
        Ok(Box::new(Self::new(options)?))
    }
}

impl Step for NormalizeUnicode {
    fn transform(&self, text: String) -> String {
        match self.form {
            Some(form) if !form.is_normalized(&text) => form.apply(&text),
            _ => text,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FullwidthToHalfwidthOptions {
    pub ascii: bool,
    pub digits: bool,
    pub latin: bool,
    pub punct: bool,
}

impl Default for FullwidthToHalfwidthOptions {
    fn default() -> Self {
        Self { ascii: true, digits: true, latin: true, punct: false }
    }
}

/// Folds fullwidth forms (U+FF01–U+FF5E, U+FFE0–U+FFE6, U+3000) to their
/// narrow counterparts, one flag per group.
#[derive(Debug, Clone, Copy)]
pub struct FullwidthToHalfwidth {
    options: FullwidthToHalfwidthOptions,
}

/// Distance between a fullwidth ASCII variant and its ASCII codepoint.
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

impl FullwidthToHalfwidth {
    pub fn new(options: FullwidthToHalfwidthOptions) -> Self {
        Self { options }
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: FullwidthToHalfwidthOptions = args.parse(super::FULLWIDTH_TO_HALFWIDTH, None)?;
        Ok(Box::new(Self::new(options)))
    }

    fn fold(&self, c: char) -> Option<char> {
        let o = &self.options;
        match c {
            'Ａ'..='Ｚ' | 'ａ'..='ｚ' if o.ascii => shift_down(c),
            '０'..='９' if o.digits => shift_down(c),
            '\u{FF01}'..='\u{FF0F}'
            | '\u{FF1A}'..='\u{FF20}'
            | '\u{FF3B}'..='\u{FF40}'
            | '\u{FF5B}'..='\u{FF5E}'
                if o.punct =>
            {
                shift_down(c)
            }
            '\u{3000}' if o.punct => Some(' '),
            '\u{FFE0}'..='\u{FFE6}' if o.latin => Some(match c {
                '\u{FFE0}' => '\u{A2}',
                '\u{FFE1}' => '\u{A3}',
                '\u{FFE2}' => '\u{AC}',
                '\u{FFE3}' => '\u{AF}',
                '\u{FFE4}' => '\u{A6}',
                '\u{FFE5}' => '\u{A5}',
                _ => '\u{20A9}',
            }),
            _ => None,
        }
    }
}

fn shift_down(c: char) -> Option<char> {
    char::from_u32(c as u32 - FULLWIDTH_OFFSET)
}

impl Step for FullwidthToHalfwidth {
    fn transform(&self, text: String) -> String {
        if !text.chars().any(|c| self.fold(c).is_some()) {
            return text;
        }
        text.chars().map(|c| self.fold(c).unwrap_or(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_unicode_forms() {
        let nfkc = NormalizeUnicode::new(NormalizeUnicodeOptions::default()).unwrap();
        assert_eq!(nfkc.transform("Ｈｅｌｌｏ①".to_string()), "Hello1");
        assert_eq!(nfkc.transform("ﬁ".to_string()), "fi");

        let nfd = NormalizeUnicode::from_args(StepArgs::Value(json!("nfd"))).unwrap();
        assert_eq!(nfd.transform("é".to_string()), "e\u{301}");

        let nfc = NormalizeUnicode::from_args(StepArgs::Value(json!("NFC"))).unwrap();
        assert_eq!(nfc.transform("e\u{301}".to_string()), "é");
        // NFC keeps compatibility characters.
        assert_eq!(nfc.transform("Ｈ".to_string()), "Ｈ");
    }

    #[test]
    fn test_normalize_unicode_null_form_is_noop() {
        let args = StepArgs::Options(json!({"form": null}).as_object().unwrap().clone());
        let step = NormalizeUnicode::from_args(args).unwrap();
        assert_eq!(step.transform("Ｈ".to_string()), "Ｈ");
    }

    #[test]
    fn test_normalize_unicode_unknown_form() {
        let err = NormalizeUnicode::from_args(StepArgs::Value(json!("NFX"))).unwrap_err();
        assert!(err.to_string().contains("unicode_normalization"));
    }

    #[test]
    fn test_fullwidth_ascii_and_digits() {
        let step = FullwidthToHalfwidth::new(FullwidthToHalfwidthOptions {
            ascii: true,
            digits: true,
            latin: false,
            punct: false,
        });
        assert_eq!(step.transform("Ｈｅｌｌｏ１２３".to_string()), "Hello123");
        // Punctuation stays fullwidth with punct off.
        assert_eq!(step.transform("ＡＢ！".to_string()), "AB！");
    }

    #[test]
    fn test_fullwidth_flags_are_independent() {
        let digits_only = FullwidthToHalfwidth::new(FullwidthToHalfwidthOptions {
            ascii: false,
            digits: true,
            latin: false,
            punct: false,
        });
        assert_eq!(digits_only.transform("Ａ１".to_string()), "Ａ1");

        let punct_only = FullwidthToHalfwidth::new(FullwidthToHalfwidthOptions {
            ascii: false,
            digits: false,
            latin: false,
            punct: true,
        });
        assert_eq!(punct_only.transform("！（ｘ）\u{3000}～".to_string()), "!(ｘ) ~");

        let latin = FullwidthToHalfwidth::new(FullwidthToHalfwidthOptions::default());
        assert_eq!(latin.transform("￥100￡".to_string()), "¥100£");
    }

    #[test]
    fn test_fullwidth_rejects_scalar() {
        assert!(FullwidthToHalfwidth::from_args(StepArgs::Value(json!("all"))).is_err());
    }
}
