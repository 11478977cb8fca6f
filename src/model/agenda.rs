//! The structured agenda tree: Meeting → Sections → Items.
//!
//! Field names are the stable JSON contract consumed downstream; they match
//! the structured agenda files the pipeline has always written
//! (`meeting_parts`, `section_name_raw`, `item_text_raw`, ...).

use serde::{Deserialize, Serialize};

/// A fully structured meeting agenda.
///
/// Built in one pass by the structure builder and immutable afterwards.
/// Every item belongs to exactly one section and every section to exactly
/// one meeting part; ordering within each list matches source line order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agenda {
    /// Agency identifier.
    pub agency: String,
    /// Meeting date string.
    pub meeting_date: String,
    /// Ordered meeting parts (scopes opened by meeting headings).
    pub meeting_parts: Vec<MeetingPart>,
}

impl Agenda {
    /// Create an empty agenda for an agency and date.
    pub fn new(agency: impl Into<String>, meeting_date: impl Into<String>) -> Self {
        Self {
            agency: agency.into(),
            meeting_date: meeting_date.into(),
            meeting_parts: Vec::new(),
        }
    }

    /// Total number of items across all parts and sections.
    pub fn item_count(&self) -> usize {
        self.meeting_parts
            .iter()
            .flat_map(|p| &p.agenda_sections)
            .map(|s| s.items.len())
            .sum()
    }

    /// Total number of sections across all parts.
    pub fn section_count(&self) -> usize {
        self.meeting_parts.iter().map(|p| p.agenda_sections.len()).sum()
    }

    /// Check if the agenda has no parts at all.
    pub fn is_empty(&self) -> bool {
        self.meeting_parts.is_empty()
    }
}

/// One meeting scope (e.g. "CLOSED SESSION" vs "REGULAR MEETING").
///
/// Documents without an explicit meeting heading get a single implicit part
/// named [`MeetingPart::FULL_MEETING`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingPart {
    /// Raw heading text of this part.
    pub meeting_part: String,
    /// Ordered sections of the part.
    pub agenda_sections: Vec<AgendaSection>,
}

impl MeetingPart {
    /// Name used for the implicit container when no meeting heading exists.
    pub const FULL_MEETING: &'static str = "full_meeting";

    /// Create an empty meeting part.
    pub fn new(meeting_part: impl Into<String>) -> Self {
        Self {
            meeting_part: meeting_part.into(),
            agenda_sections: Vec::new(),
        }
    }

    /// Create the implicit fallback part.
    pub fn implicit() -> Self {
        Self::new(Self::FULL_MEETING)
    }
}

/// An agenda section and its items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaSection {
    /// Heading text exactly as it appeared in the source.
    pub section_name_raw: String,
    /// Extracted numbering prefix ("II.", "3."), empty when none was found.
    pub section_number: String,
    /// Heading text with the numbering prefix stripped.
    pub section_name: String,
    /// Ordered items of the section.
    pub items: Vec<AgendaItem>,
}

impl AgendaSection {
    /// Create a section from its raw heading text. Numbering extraction and
    /// name cleanup happen in the structure builder's post-pass.
    pub fn new(section_name_raw: impl Into<String>) -> Self {
        let raw = section_name_raw.into();
        Self {
            section_name: raw.trim().to_string(),
            section_name_raw: raw,
            section_number: String::new(),
            items: Vec::new(),
        }
    }
}

/// A single agenda item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaItem {
    /// Item text accumulated across continuation lines, uncleaned.
    pub item_text_raw: String,
    /// Extracted numbering prefix, empty when none was found.
    pub item_number: String,
    /// Item text with the numbering prefix stripped.
    pub item_text: String,
}

impl AgendaItem {
    /// Create an item from the first line of its text.
    pub fn new(item_text_raw: impl Into<String>) -> Self {
        let raw = item_text_raw.into();
        Self {
            item_text: raw.trim().to_string(),
            item_text_raw: raw,
            item_number: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut agenda = Agenda::new("gavilan", "04-05-2016");
        let mut part = MeetingPart::new("REGULAR MEETING");
        let mut section = AgendaSection::new("II. Consent Calendar");
        section.items.push(AgendaItem::new("3. Approval of Minutes"));
        section.items.push(AgendaItem::new("4. Warrants"));
        part.agenda_sections.push(section);
        agenda.meeting_parts.push(part);

        assert_eq!(agenda.section_count(), 1);
        assert_eq!(agenda.item_count(), 2);
        assert!(!agenda.is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let mut agenda = Agenda::new("a", "d");
        agenda.meeting_parts.push(MeetingPart::implicit());
        let json = serde_json::to_string(&agenda).unwrap();
        assert!(json.contains("\"meeting_parts\""));
        assert!(json.contains("\"meeting_part\":\"full_meeting\""));
    }
}
