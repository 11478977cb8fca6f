//! Numbering extraction shared by sections and items.
//!
//! A small family of prefix patterns is tried in a fixed order; the first
//! match wins, regardless of match length. The order is a deliberate policy:
//!
//! 1. decimal ("3.", "12)")
//! 2. decimal-dot-decimal ("1.1")
//! 3. decimal-dot-letter ("1.A")
//! 4. single enumerating letter ("(a)", "B.")
//! 5. roman numeral ("II.", "IV)")
//!
//! Single-letter roman numerals ("I.", "V.", "X.") therefore resolve via the
//! letter pattern; the roman pattern only sees multi-character numerals. The
//! extracted substring is identical either way, so this only pins down the
//! ambiguity, it does not change outputs.

use once_cell::sync::Lazy;
use regex::Regex;

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.)]?\s+").unwrap());
static SUBNUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\s+").unwrap());
static NUMBER_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.[A-Za-z]\s+").unwrap());
static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(?[A-Za-z][.)]?\s+").unwrap());
static ROMAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})[.)]?\s+").unwrap());

static LEADING_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s?[.)]").unwrap());

/// A numbering prefix detached from its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberMatch {
    /// The numbering, whitespace-trimmed, trailing punctuation kept ("3.").
    pub number: String,
    /// The text with the numbering and one leading separator stripped.
    pub rest: String,
}

/// Try the pattern family against the start of the (trimmed) text.
///
/// Returns `None` when no pattern matches; the caller leaves the number
/// empty and keeps the trimmed text as-is.
pub fn extract_number(text: &str) -> Option<NumberMatch> {
    let trimmed = text.trim();
    let matched = match_prefix(trimmed)?;

    let number = LEADING_SEPARATOR
        .replace(matched.trim(), "")
        .trim()
        .to_string();
    if number.is_empty() {
        return None;
    }

    // Strip the first occurrence of the number, then a single leading
    // separator left behind ("3" + "." cases), then re-trim.
    let rest = trimmed.replacen(&number, "", 1);
    let rest = LEADING_SEPARATOR.replace(&rest, "");
    let rest = rest.trim().to_string();

    Some(NumberMatch { number, rest })
}

fn match_prefix(trimmed: &str) -> Option<&str> {
    if let Some(m) = DECIMAL.find(trimmed) {
        return Some(m.as_str());
    }
    if let Some(m) = SUBNUMBER.find(trimmed) {
        return Some(m.as_str());
    }
    if let Some(m) = NUMBER_LETTER.find(trimmed) {
        return Some(m.as_str());
    }
    if let Some(m) = LETTER.find(trimmed) {
        return Some(m.as_str());
    }
    if let Some(caps) = ROMAN.captures(trimmed) {
        let numeral_len =
            caps.get(1).map_or(0, |m| m.len()) + caps.get(2).map_or(0, |m| m.len());
        if numeral_len > 0 {
            return Some(caps.get(0).map(|m| m.as_str()).unwrap_or_default());
        }
    }
    None
}
