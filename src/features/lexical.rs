//! Lexical prefix/content flags derived from line text.
//!
//! These regexes mirror the features the classifier was trained on; changing
//! them invalidates previously fitted models.

use once_cell::sync::Lazy;
use regex::Regex;

static STARTS_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.?\s+").unwrap());
static STARTS_SUBNUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\s+").unwrap());
static STARTS_ROMAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})\.\s+").unwrap());
static STARTS_ENUM_LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(?[A-Za-z][).]?\s+").unwrap());
static INCLUDES_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b\d{1,2}:\d{2}|\b[ap]\.?m\b").unwrap());

/// Line starts with a decimal number ("3. ", "12 ").
pub fn starts_with_number(text: &str) -> bool {
    STARTS_NUMBER.is_match(text)
}

/// Line starts with a decimal sub-number ("1.1 ").
pub fn starts_with_subnumber(text: &str) -> bool {
    STARTS_SUBNUMBER.is_match(text)
}

/// Line starts with a roman numeral followed by a dot ("IV. ").
pub fn starts_with_roman_numeral(text: &str) -> bool {
    // The alternation groups may both match empty; require a real numeral.
    match STARTS_ROMAN.captures(text) {
        Some(caps) => {
            let len = caps.get(1).map_or(0, |m| m.len()) + caps.get(2).map_or(0, |m| m.len());
            len > 0
        }
        None => false,
    }
}

/// Line starts with a single enumerating letter ("(a) ", "B. ").
pub fn starts_with_enum_letter(text: &str) -> bool {
    STARTS_ENUM_LETTER.is_match(text)
}

/// Line contains a time-of-day token ("7:00", "p.m.").
pub fn includes_time(text: &str) -> bool {
    INCLUDES_TIME.is_match(text)
}

/// Every alphabetic character in the line is uppercase.
pub fn is_uppercase(text: &str) -> bool {
    let mut saw_letter = false;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        saw_letter = true;
        if !c.is_uppercase() {
            return false;
        }
    }
    saw_letter
}

/// Font name suggests a bold face.
pub fn font_is_bold(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}

/// Font name suggests an italic face.
pub fn font_is_italic(font_name: &str) -> bool {
    let lower = font_name.to_lowercase();
    lower.contains("italic") || lower.contains("oblique")
}
