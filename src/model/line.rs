//! Line-level types: extracted lines and their classified roles.

use serde::{Deserialize, Serialize};

/// The role of a single line within an agenda document.
///
/// Exactly one role applies to every line; the classifier never produces
/// multi-label output. The declaration order doubles as the fixed tie-break
/// priority when class scores are exactly equal: `MeetingHeading` wins over
/// `SectionHeading`, and so on down to `OtherText`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Heading that opens a new meeting scope (e.g. "REGULAR BOARD MEETING").
    MeetingHeading,
    /// Heading that opens an agenda section (e.g. "II. CONSENT CALENDAR").
    SectionHeading,
    /// First line of an agenda item.
    ItemHeading,
    /// Continuation line of an open agenda item.
    ItemText,
    /// Decorative or boilerplate text that belongs to no item.
    OtherText,
}

impl Role {
    /// All roles, in tie-break priority order (highest first).
    pub const ALL: [Role; 5] = [
        Role::MeetingHeading,
        Role::SectionHeading,
        Role::ItemHeading,
        Role::ItemText,
        Role::OtherText,
    ];

    /// Stable snake_case name, matching the training-table column names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::MeetingHeading => "meeting_heading",
            Role::SectionHeading => "section_heading",
            Role::ItemHeading => "item_heading",
            Role::ItemText => "item_text",
            Role::OtherText => "other_text",
        }
    }

    /// Tie-break priority: lower is stronger.
    pub fn priority(&self) -> usize {
        Role::ALL.iter().position(|r| r == self).unwrap_or(usize::MAX)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "meeting_heading" => Ok(Role::MeetingHeading),
            "section_heading" => Ok(Role::SectionHeading),
            "item_heading" => Ok(Role::ItemHeading),
            "item_text" => Ok(Role::ItemText),
            "other_text" => Ok(Role::OtherText),
            _ => Err(format!("unknown line role: {s}")),
        }
    }
}

/// One visually distinct row of text on one page, with the typographic and
/// positional attributes the classifier features are derived from.
///
/// Lines are immutable once extracted. `(page_index, line_index)` is the
/// total ordering key; `line_index` is global across the document, so no two
/// lines of a document ever share it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    /// Agency identifier this document belongs to (provenance).
    pub agency: String,
    /// Meeting date string, as carried in the source filename/metadata.
    pub meeting_date: String,
    /// Zero-based page the line appears on.
    pub page_index: u32,
    /// Zero-based position within the whole document.
    pub line_index: u32,
    /// Whitespace-trimmed text of the line.
    pub text: String,
    /// Font name of the line's first character.
    pub font_name: String,
    /// Font size of the line's first character, in layout units.
    pub font_size: f32,
    /// Horizontal inset of the first non-space character from the page edge.
    pub left_inset: f32,
    /// Every alphabetic character is uppercase.
    pub is_uppercase: bool,
    /// Starts with a decimal number ("3. ", "12 ").
    pub starts_with_number: bool,
    /// Starts with a decimal sub-number ("1.1 ").
    pub starts_with_subnumber: bool,
    /// Starts with a roman numeral ("IV. ").
    pub starts_with_roman_numeral: bool,
    /// Starts with a single enumerating letter ("(a) ", "B. ").
    pub starts_with_enum_letter: bool,
    /// Contains a time-of-day token ("7:00 p.m.").
    pub includes_time: bool,
    /// Font name suggests a bold face.
    pub is_bold: bool,
    /// Font name suggests an italic face.
    pub is_italic: bool,
}

impl Line {
    /// Stable identifier for this line: `{agency}_{meeting_date}_{line_index}`.
    pub fn line_id(&self) -> String {
        format!("{}_{}_{}", self.agency, self.meeting_date, self.line_index)
    }
}

/// A [`Line`] plus its role, produced either by manual annotation (training
/// data) or by the classifier (inference data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledLine {
    /// The underlying line.
    #[serde(flatten)]
    pub line: Line,
    /// The single role assigned to the line.
    pub role: Role,
}

impl LabeledLine {
    /// Attach a role to a line.
    pub fn new(line: Line, role: Role) -> Self {
        Self { line, role }
    }

    /// The line's text.
    pub fn text(&self) -> &str {
        &self.line.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn test_role_priority_order() {
        assert!(Role::MeetingHeading.priority() < Role::SectionHeading.priority());
        assert!(Role::ItemText.priority() < Role::OtherText.priority());
    }

    #[test]
    fn test_line_id() {
        let line = Line {
            agency: "gavilan".to_string(),
            meeting_date: "04-05-2016".to_string(),
            page_index: 0,
            line_index: 7,
            text: "Roll Call".to_string(),
            font_name: "Helvetica".to_string(),
            font_size: 11.0,
            left_inset: 72.0,
            is_uppercase: false,
            starts_with_number: false,
            starts_with_subnumber: false,
            starts_with_roman_numeral: false,
            starts_with_enum_letter: false,
            includes_time: false,
            is_bold: false,
            is_italic: false,
        };
        assert_eq!(line.line_id(), "gavilan_04-05-2016_7");
    }
}
