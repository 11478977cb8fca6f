//! Structure builder: classified line sequence → agenda tree.
//!
//! A single-pass state machine. Structural violations (item text with no
//! open item, item headings with no section) are recoverable: the line is
//! dropped or attached to an implicit container, a warning is recorded, and
//! processing continues. The whole document is never aborted.

use log::warn;

use super::numbering::extract_number;
use crate::model::{Agenda, AgendaItem, AgendaSection, LabeledLine, MeetingPart, Role};

/// A recoverable structural anomaly encountered while building the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureWarning {
    /// `line_index` of the offending line.
    pub line_index: u32,
    /// What happened and how it was handled.
    pub message: String,
}

/// Build an [`Agenda`] from a classified line sequence.
///
/// Returns the tree and the structural warnings raised along the way.
pub fn build_agenda(
    agency: &str,
    meeting_date: &str,
    lines: &[LabeledLine],
) -> (Agenda, Vec<StructureWarning>) {
    let mut builder = StructureBuilder::new(agency, meeting_date);
    for (i, line) in lines.iter().enumerate() {
        let next_role = lines.get(i + 1).map(|l| l.role);
        builder.push(line, next_role);
    }
    builder.finish()
}

/// The state machine itself. State is held as explicit positions into the
/// growing tree plus the `item_open` flag; transitions only ever touch the
/// latest part/section/item.
pub struct StructureBuilder {
    agenda: Agenda,
    item_open: bool,
    warnings: Vec<StructureWarning>,
}

impl StructureBuilder {
    /// Start building an agenda for an agency and date.
    pub fn new(agency: &str, meeting_date: &str) -> Self {
        Self {
            agenda: Agenda::new(agency, meeting_date),
            item_open: false,
            warnings: Vec::new(),
        }
    }

    /// Consume one classified line. `next_role` is the role of the line that
    /// follows in the sequence, used only by the paragraph-break heuristic.
    pub fn push(&mut self, line: &LabeledLine, next_role: Option<Role>) {
        match line.role {
            Role::MeetingHeading => {
                self.agenda
                    .meeting_parts
                    .push(MeetingPart::new(line.text()));
                self.item_open = false;
            }
            Role::SectionHeading => {
                self.ensure_part();
                self.current_part()
                    .agenda_sections
                    .push(AgendaSection::new(line.text()));
                self.item_open = false;
            }
            Role::ItemHeading => {
                self.ensure_section(line);
                self.current_section()
                    .items
                    .push(AgendaItem::new(line.text()));
                self.item_open = true;
            }
            Role::ItemText => {
                if self.item_open {
                    let item = self.current_item();
                    item.item_text_raw.push(' ');
                    item.item_text_raw.push_str(line.text());
                } else {
                    self.warn(
                        line,
                        "item text outside any open agenda item; line dropped",
                    );
                }
            }
            Role::OtherText => {
                // Blank or decorative lines between item-text lines become
                // paragraph breaks rather than disappearing silently.
                if self.item_open && next_role == Some(Role::ItemText) {
                    self.current_item().item_text_raw.push('\n');
                }
            }
        }
    }

    /// Finish the pass: run numbering extraction and text cleanup on every
    /// section and item, then hand the tree over.
    pub fn finish(mut self) -> (Agenda, Vec<StructureWarning>) {
        for part in &mut self.agenda.meeting_parts {
            for section in &mut part.agenda_sections {
                match extract_number(&section.section_name_raw) {
                    Some(m) => {
                        section.section_number = m.number;
                        section.section_name = m.rest;
                    }
                    None => {
                        section.section_number.clear();
                        section.section_name = section.section_name_raw.trim().to_string();
                    }
                }
                for item in &mut section.items {
                    match extract_number(&item.item_text_raw) {
                        Some(m) => {
                            item.item_number = m.number;
                            item.item_text = m.rest;
                        }
                        None => {
                            item.item_number.clear();
                            item.item_text = item.item_text_raw.trim().to_string();
                        }
                    }
                }
            }
        }
        (self.agenda, self.warnings)
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[StructureWarning] {
        &self.warnings
    }

    fn ensure_part(&mut self) {
        if self.agenda.meeting_parts.is_empty() {
            self.agenda.meeting_parts.push(MeetingPart::implicit());
        }
    }

    /// Guarantee a section exists for an arriving item heading, pre-seeding
    /// the implicit containers when the document never announced them.
    fn ensure_section(&mut self, line: &LabeledLine) {
        self.ensure_part();
        if self.current_part().agenda_sections.is_empty() {
            self.warn(
                line,
                "item heading with no open section; attached to implicit section",
            );
            self.current_part()
                .agenda_sections
                .push(AgendaSection::new(MeetingPart::FULL_MEETING));
        }
    }

    fn current_part(&mut self) -> &mut MeetingPart {
        // ensure_part ran first on every path that reaches here.
        self.agenda
            .meeting_parts
            .last_mut()
            .unwrap_or_else(|| unreachable!("no meeting part"))
    }

    fn current_section(&mut self) -> &mut AgendaSection {
        self.current_part()
            .agenda_sections
            .last_mut()
            .unwrap_or_else(|| unreachable!("no agenda section"))
    }

    fn current_item(&mut self) -> &mut AgendaItem {
        self.current_section()
            .items
            .last_mut()
            .unwrap_or_else(|| unreachable!("no agenda item"))
    }

    fn warn(&mut self, line: &LabeledLine, message: &str) {
        warn!("line {} ({:?}): {message}", line.line.line_index, line.text());
        self.warnings.push(StructureWarning {
            line_index: line.line.line_index,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Line;

    fn labeled(text: &str, role: Role, index: u32) -> LabeledLine {
        let line = Line {
            agency: "gavilan".to_string(),
            meeting_date: "04-05-2016".to_string(),
            page_index: 0,
            line_index: index,
            text: text.to_string(),
            font_name: "Times".to_string(),
            font_size: 12.0,
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
        LabeledLine::new(line, role)
    }

    fn seq(entries: &[(&str, Role)]) -> Vec<LabeledLine> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (text, role))| labeled(text, *role, i as u32))
            .collect()
    }

    #[test]
    fn test_nested_numbering_scenario() {
        let lines = seq(&[
            ("II. Consent Calendar", Role::SectionHeading),
            ("3. Approval of Minutes", Role::ItemHeading),
        ]);
        let (agenda, warnings) = build_agenda("gavilan", "04-05-2016", &lines);

        assert!(warnings.is_empty());
        let section = &agenda.meeting_parts[0].agenda_sections[0];
        assert_eq!(section.section_number, "II.");
        assert_eq!(section.section_name, "Consent Calendar");
        let item = &section.items[0];
        assert_eq!(item.item_number, "3.");
        assert_eq!(item.item_text, "Approval of Minutes");
    }

    #[test]
    fn test_meeting_heading_opens_scope() {
        let lines = seq(&[
            ("CLOSED SESSION", Role::MeetingHeading),
            ("A. Litigation", Role::SectionHeading),
            ("OPEN SESSION", Role::MeetingHeading),
            ("B. Reports", Role::SectionHeading),
        ]);
        let (agenda, _) = build_agenda("a", "d", &lines);

        assert_eq!(agenda.meeting_parts.len(), 2);
        assert_eq!(agenda.meeting_parts[0].meeting_part, "CLOSED SESSION");
        assert_eq!(agenda.meeting_parts[0].agenda_sections.len(), 1);
        assert_eq!(agenda.meeting_parts[1].agenda_sections.len(), 1);
    }

    #[test]
    fn test_item_text_joins_with_space() {
        let lines = seq(&[
            ("Reports", Role::SectionHeading),
            ("1. Budget update", Role::ItemHeading),
            ("for fiscal year 2016", Role::ItemText),
        ]);
        let (agenda, warnings) = build_agenda("a", "d", &lines);

        assert!(warnings.is_empty());
        let item = &agenda.meeting_parts[0].agenda_sections[0].items[0];
        assert_eq!(item.item_text_raw, "1. Budget update for fiscal year 2016");
        assert_eq!(item.item_text, "Budget update for fiscal year 2016");
    }

    #[test]
    fn test_orphan_item_text_warns_without_corruption() {
        let lines = seq(&[
            ("Reports", Role::SectionHeading),
            ("stray continuation", Role::ItemText),
            ("1. Budget update", Role::ItemHeading),
        ]);
        let (agenda, warnings) = build_agenda("a", "d", &lines);

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line_index, 1);
        // Subsequent well-formed lines still parse; no tree mutation from
        // the stray line.
        let section = &agenda.meeting_parts[0].agenda_sections[0];
        assert_eq!(section.items.len(), 1);
        assert_eq!(section.items[0].item_text, "Budget update");
    }

    #[test]
    fn test_other_text_becomes_paragraph_break() {
        let lines = seq(&[
            ("Reports", Role::SectionHeading),
            ("1. Budget update", Role::ItemHeading),
            ("---", Role::OtherText),
            ("second paragraph", Role::ItemText),
        ]);
        let (agenda, _) = build_agenda("a", "d", &lines);

        let item = &agenda.meeting_parts[0].agenda_sections[0].items[0];
        assert_eq!(item.item_text_raw, "1. Budget update\n second paragraph");
    }

    #[test]
    fn test_other_text_ignored_when_not_followed_by_item_text() {
        let lines = seq(&[
            ("Reports", Role::SectionHeading),
            ("1. Budget update", Role::ItemHeading),
            ("Page 2 of 4", Role::OtherText),
            ("2. Warrants", Role::ItemHeading),
        ]);
        let (agenda, _) = build_agenda("a", "d", &lines);

        let section = &agenda.meeting_parts[0].agenda_sections[0];
        assert_eq!(section.items[0].item_text_raw, "1. Budget update");
        assert_eq!(section.items.len(), 2);
    }

    #[test]
    fn test_implicit_containers_for_headless_document() {
        let lines = seq(&[
            ("1. Call to Order", Role::ItemHeading),
            ("2. Roll Call", Role::ItemHeading),
        ]);
        let (agenda, warnings) = build_agenda("a", "d", &lines);

        assert_eq!(agenda.meeting_parts.len(), 1);
        assert_eq!(agenda.meeting_parts[0].meeting_part, MeetingPart::FULL_MEETING);
        assert_eq!(agenda.meeting_parts[0].agenda_sections.len(), 1);
        assert_eq!(agenda.item_count(), 2);
        // The pre-seeded section is reported, once.
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_section_without_meeting_heading_gets_implicit_part() {
        let lines = seq(&[("Consent Calendar", Role::SectionHeading)]);
        let (agenda, warnings) = build_agenda("a", "d", &lines);

        assert!(warnings.is_empty());
        assert_eq!(agenda.meeting_parts[0].meeting_part, MeetingPart::FULL_MEETING);
    }

    #[test]
    fn test_every_item_reachable_from_one_section() {
        let lines = seq(&[
            ("I. Opening", Role::SectionHeading),
            ("1. Call to Order", Role::ItemHeading),
            ("II. Consent", Role::SectionHeading),
            ("2. Minutes", Role::ItemHeading),
            ("3. Warrants", Role::ItemHeading),
        ]);
        let (agenda, _) = build_agenda("a", "d", &lines);

        let counts: Vec<usize> = agenda.meeting_parts[0]
            .agenda_sections
            .iter()
            .map(|s| s.items.len())
            .collect();
        assert_eq!(counts, vec![1, 2]);
        assert_eq!(agenda.item_count(), 3);
    }
}
