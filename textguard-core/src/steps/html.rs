// textguard-core/src/steps/html.rs
//! HTML steps: `html_decode`, `strip_html` and `whitelist_html`.
//!
//! Tag handling is regex based and works on one tag at a time. It is good
//! enough for user-entered rich text but is not a tree-aware sanitizer and
//! makes no promises about adversarial, malformed markup.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::errors::TextGuardError;
use crate::step::{Step, StepArgs};

use super::owned_if_changed;

/// Comments, named tags, and any other `<!...>`, `<?...>` or `</...>` markup.
static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9]*)([^>]*)>|<[!?/][^>]*>")
        .expect("static markup pattern")
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("static attribute pattern")
});

static URL_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z][A-Za-z0-9+.\-]*):").expect("static url scheme pattern")
});

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HtmlDecodeOptions {
    pub enabled: bool,
}

impl Default for HtmlDecodeOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Decodes named and numeric character references, quotes included.
#[derive(Debug, Clone)]
pub struct HtmlDecode {
    enabled: bool,
}

impl HtmlDecode {
    pub fn new(options: HtmlDecodeOptions) -> Self {
        Self { enabled: options.enabled }
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: HtmlDecodeOptions = args.parse(super::HTML_DECODE, Some("enabled"))?;
        Ok(Box::new(Self::new(options)))
    }
}

impl Step for HtmlDecode {
    fn transform(&self, text: String) -> String {
        if !self.enabled {
            return text;
        }
        owned_if_changed(html_escape::decode_html_entities(&text)).unwrap_or(text)
    }
}

/// Removes comments and every complete tag, keeping text content.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripHtml;

impl StripHtml {
    pub fn from_args(_args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        Ok(Box::new(StripHtml))
    }
}

impl Step for StripHtml {
    fn transform(&self, text: String) -> String {
        owned_if_changed(MARKUP.replace_all(&text, "")).unwrap_or(text)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lower(items: Vec<String>) -> HashSet<String> {
    items.into_iter().map(|s| s.trim().to_ascii_lowercase()).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WhitelistHtmlOptions {
    pub tags: Vec<String>,
    pub attrs: Vec<String>,
    pub protocols: Vec<String>,
}

impl Default for WhitelistHtmlOptions {
    fn default() -> Self {
        Self {
            tags: strings(&[
                "p", "b", "i", "u", "a", "ul", "ol", "li", "code", "pre", "br", "blockquote", "h1", "h2", "h3",
            ]),
            attrs: strings(&["href", "title", "rel"]),
            protocols: strings(&["http", "https", "mailto"]),
        }
    }
}

/// Keeps only whitelisted tags, re-emitted in canonical form.
///
/// An attribute on a kept tag survives only when its name is whitelisted
/// and its value is a URL whose scheme is whitelisted. Everything else is
/// dropped; the tag itself stays.
#[derive(Debug, Clone)]
pub struct WhitelistHtml {
    tags: HashSet<String>,
    attrs: HashSet<String>,
    protocols: HashSet<String>,
}

impl WhitelistHtml {
    pub fn new(options: WhitelistHtmlOptions) -> Self {
        Self {
            tags: lower(options.tags),
            attrs: lower(options.attrs),
            protocols: lower(options.protocols),
        }
    }

    pub fn from_args(args: StepArgs) -> Result<Box<dyn Step>, TextGuardError> {
        let options: WhitelistHtmlOptions = args.parse(super::WHITELIST_HTML, None)?;
        Ok(Box::new(Self::new(options)))
    }

    fn has_allowed_scheme(&self, value: &str) -> bool {
        URL_SCHEME
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map_or(false, |scheme| self.protocols.contains(&scheme.as_str().to_ascii_lowercase()))
    }

    fn rewrite_tag(&self, caps: &Captures<'_>) -> String {
        let Some(name) = caps.get(2) else {
            // Comments, doctypes, processing instructions.
            return String::new();
        };
        let name = name.as_str().to_ascii_lowercase();
        if !self.tags.contains(&name) {
            return String::new();
        }

        let closing = caps.get(1).map_or(false, |m| !m.as_str().is_empty());
        if closing {
            return format!("</{}>", name);
        }

        let raw_attrs = caps.get(3).map_or("", |m| m.as_str());
        let mut tag = format!("<{}", name);
        for attr in ATTRIBUTE.captures_iter(raw_attrs) {
            let attr_name = attr[1].to_ascii_lowercase();
            if !self.attrs.contains(&attr_name) {
                continue;
            }
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| m.as_str());
            match value {
                Some(value) if self.has_allowed_scheme(value) => {
                    tag.push_str(&format!(" {}=\"{}\"", attr_name, value.replace('"', "&quot;")));
                }
                _ => {}
            }
        }
        if raw_attrs.trim_end().ends_with('/') {
            tag.push('/');
        }
        tag.push('>');
        tag
    }
}

impl Step for WhitelistHtml {
    fn transform(&self, text: String) -> String {
        owned_if_changed(MARKUP.replace_all(&text, |caps: &Captures<'_>| self.rewrite_tag(caps)))
            .unwrap_or(text)
    }
}
