// src/formatting/sanitizer.rs
//! Removes placeholder text and advertising markers from article markup.
//!
//! Cleaning runs the configured phrase rules in order, then drops `<p>` and
//! `<div>` elements left with nothing but whitespace, `&nbsp;` or `<br>`.
//! Removing a phrase can empty a block and removing a block can join text
//! into a new phrase occurrence, so the pass repeats until nothing changes.
//! That makes [`Sanitizer::clean`] idempotent.

use crate::types::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Page-builder stock texts that end up in published articles when an
/// editor forgets to replace them.
const DEFAULT_PLACEHOLDERS: &[&str] = &[
    "Add Your Heading Text Here",
    "I am text block. Click edit button to change this text.",
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Ut elit tellus, luctus nec ullamcorper mattis, pulvinar dapibus leo.",
];

/// Disclosure labels the site prints in brackets next to paid content.
const DEFAULT_MARKERS: &[&str] = &["Anzeige", "Werbung", "Advertisement", "Sponsored"];

static EMPTY_PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<p(?:\s[^>]*)?>(?:\s|&nbsp;|&#160;|<br\s*/?>)*</p>")
        .expect("EMPTY_PARAGRAPH regex is valid")
});

static EMPTY_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<div(?:\s[^>]*)?>(?:\s|&nbsp;|&#160;|<br\s*/?>)*</div>")
        .expect("EMPTY_DIV regex is valid")
});

/// What to strip, and in which forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseRule {
    /// Removed bare, `[bracketed]` and `(parenthesized)`.
    Phrase(String),
    /// Removed only when bracketed or parenthesized, so the word itself
    /// can still appear in running text.
    Marker(String),
}

impl PhraseRule {
    pub fn text(&self) -> &str {
        match self {
            PhraseRule::Phrase(text) | PhraseRule::Marker(text) => text,
        }
    }

    /// Case-insensitive pattern; any run of whitespace in the phrase
    /// matches any run of whitespace in the markup.
    fn pattern(&self) -> Option<String> {
        let words: Vec<String> = self
            .text()
            .split_whitespace()
            .map(regex::escape)
            .collect();
        if words.is_empty() {
            return None;
        }
        let body = words.join(r"\s+");
        let wrapped = format!(r"\[\s*{body}\s*\]|\(\s*{body}\s*\)");
        Some(match self {
            PhraseRule::Phrase(_) => format!("(?i){wrapped}|{body}"),
            PhraseRule::Marker(_) => format!("(?i){wrapped}"),
        })
    }
}

/// A configured markup cleaner.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    rules: Vec<PhraseRule>,
    patterns: Vec<Regex>,
}

impl Sanitizer {
    /// Compiles the rules. Blank rules are ignored.
    pub fn new(rules: Vec<PhraseRule>) -> Result<Self, ValidationError> {
        let mut kept = Vec::with_capacity(rules.len());
        let mut patterns = Vec::with_capacity(rules.len());
        for rule in rules {
            let Some(pattern) = rule.pattern() else {
                continue;
            };
            let regex = Regex::new(&pattern).map_err(|e| ValidationError::InvalidPattern {
                pattern: rule.text().to_string(),
                reason: e.to_string(),
            })?;
            kept.push(rule);
            patterns.push(regex);
        }
        Ok(Self {
            rules: kept,
            patterns,
        })
    }

    /// A sanitizer that only collapses empty blocks.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            patterns: Vec::new(),
        }
    }

    pub fn default_rules() -> Vec<PhraseRule> {
        DEFAULT_PLACEHOLDERS
            .iter()
            .map(|p| PhraseRule::Phrase(p.to_string()))
            .chain(DEFAULT_MARKERS.iter().map(|m| PhraseRule::Marker(m.to_string())))
            .collect()
    }

    /// The default rules followed by `extra`.
    pub fn with_extra_rules(extra: Vec<PhraseRule>) -> Result<Self, ValidationError> {
        let mut rules = Self::default_rules();
        rules.extend(extra);
        Self::new(rules)
    }

    pub fn rules(&self) -> &[PhraseRule] {
        &self.rules
    }

    /// Cleans `markup`. Never fails; markup without matches comes back
    /// unchanged.
    pub fn clean(&self, markup: &str) -> String {
        let mut current = markup.to_string();
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return next;
            }
            current = next;
        }
    }

    fn clean_once(&self, markup: &str) -> String {
        let mut text = markup.to_string();
        for pattern in &self.patterns {
            if pattern.is_match(&text) {
                text = pattern.replace_all(&text, "").into_owned();
            }
        }
        for block in [&*EMPTY_PARAGRAPH, &*EMPTY_DIV] {
            if block.is_match(&text) {
                text = block.replace_all(&text, "").into_owned();
            }
        }
        text
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(Self::default_rules()).unwrap_or_else(|e| {
            log::error!("Default sanitizer rules failed to compile: {}", e);
            Self::empty()
        })
    }
}
