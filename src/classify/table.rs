//! CSV line tables: extracted lines, labeled training rows, classified rows.
//!
//! One row = the line attributes plus five mutually exclusive role indicator
//! columns. Manual annotation (an external tool) fills the indicators on the
//! extracted-lines table; the trainer and the structure step read the same
//! shape back.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{LabeledLine, Line, Role};

/// One CSV row of a line table.
///
/// Role indicator columns are absent (empty) on unlabeled tables and 0/1 on
/// labeled ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    pub line_id: String,
    pub agency: String,
    pub meeting_date: String,
    pub page_index: u32,
    pub line_index: u32,
    pub text: String,
    pub font_name: String,
    pub font_size: f32,
    pub left_inset: f32,
    pub uppercase: u8,
    pub starts_with_number: u8,
    pub starts_with_subnumber: u8,
    pub starts_with_roman_numeral: u8,
    pub starts_with_enum_letter: u8,
    pub includes_time: u8,
    pub is_bold: u8,
    pub is_italic: u8,
    #[serde(default)]
    pub meeting_heading: Option<u8>,
    #[serde(default)]
    pub section_heading: Option<u8>,
    #[serde(default)]
    pub item_heading: Option<u8>,
    #[serde(default)]
    pub item_text: Option<u8>,
    #[serde(default)]
    pub other_text: Option<u8>,
}

impl LineRecord {
    /// Build an unlabeled record from a line.
    pub fn from_line(line: &Line) -> Self {
        let flag = |b: bool| u8::from(b);
        Self {
            line_id: line.line_id(),
            agency: line.agency.clone(),
            meeting_date: line.meeting_date.clone(),
            page_index: line.page_index,
            line_index: line.line_index,
            text: line.text.clone(),
            font_name: line.font_name.clone(),
            font_size: line.font_size,
            left_inset: line.left_inset,
            uppercase: flag(line.is_uppercase),
            starts_with_number: flag(line.starts_with_number),
            starts_with_subnumber: flag(line.starts_with_subnumber),
            starts_with_roman_numeral: flag(line.starts_with_roman_numeral),
            starts_with_enum_letter: flag(line.starts_with_enum_letter),
            includes_time: flag(line.includes_time),
            is_bold: flag(line.is_bold),
            is_italic: flag(line.is_italic),
            meeting_heading: None,
            section_heading: None,
            item_heading: None,
            item_text: None,
            other_text: None,
        }
    }

    /// Build a labeled record from a classified line.
    pub fn from_labeled(labeled: &LabeledLine) -> Self {
        let mut record = Self::from_line(&labeled.line);
        let ind = |role| Some(u8::from(labeled.role == role));
        record.meeting_heading = ind(Role::MeetingHeading);
        record.section_heading = ind(Role::SectionHeading);
        record.item_heading = ind(Role::ItemHeading);
        record.item_text = ind(Role::ItemText);
        record.other_text = ind(Role::OtherText);
        record
    }

    /// The line attributes of this record.
    pub fn to_line(&self) -> Line {
        Line {
            agency: self.agency.clone(),
            meeting_date: self.meeting_date.clone(),
            page_index: self.page_index,
            line_index: self.line_index,
            text: self.text.clone(),
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            left_inset: self.left_inset,
            is_uppercase: self.uppercase != 0,
            starts_with_number: self.starts_with_number != 0,
            starts_with_subnumber: self.starts_with_subnumber != 0,
            starts_with_roman_numeral: self.starts_with_roman_numeral != 0,
            starts_with_enum_letter: self.starts_with_enum_letter != 0,
            includes_time: self.includes_time != 0,
            is_bold: self.is_bold != 0,
            is_italic: self.is_italic != 0,
        }
    }

    /// Resolve the role indicator columns into a single role.
    ///
    /// A row with zero or multiple indicators set is a fatal input-validation
    /// error: it indicates a corrupted label set.
    pub fn to_labeled(&self, row: usize) -> Result<LabeledLine> {
        let indicators = [
            (Role::MeetingHeading, self.meeting_heading),
            (Role::SectionHeading, self.section_heading),
            (Role::ItemHeading, self.item_heading),
            (Role::ItemText, self.item_text),
            (Role::OtherText, self.other_text),
        ];
        let active: Vec<Role> = indicators
            .iter()
            .filter(|(_, v)| v.unwrap_or(0) != 0)
            .map(|(role, _)| *role)
            .collect();

        if active.len() != 1 {
            return Err(Error::InvalidLabel {
                row,
                line_id: self.line_id.clone(),
                active: active.len(),
            });
        }
        Ok(LabeledLine::new(self.to_line(), active[0]))
    }
}

/// Write extracted lines as an unlabeled CSV table.
pub fn write_lines_csv<W: Write>(lines: &[Line], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for line in lines {
        wtr.serialize(LineRecord::from_line(line))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write classified lines as a labeled CSV table.
pub fn write_labeled_csv<W: Write>(lines: &[LabeledLine], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for labeled in lines {
        wtr.serialize(LineRecord::from_labeled(labeled))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Read a labeled CSV table, validating the exactly-one-role rule per row.
pub fn read_labeled_csv<R: Read>(reader: R) -> Result<Vec<LabeledLine>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut lines = Vec::new();
    for (row, record) in rdr.deserialize::<LineRecord>().enumerate() {
        lines.push(record?.to_labeled(row)?);
    }
    Ok(lines)
}

/// Load and concatenate every labeled `.csv` table in a directory, in
/// file-name order.
pub fn read_training_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<LabeledLine>> {
    let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(Error::Training(format!(
            "no .csv training tables in {}",
            dir.as_ref().display()
        )));
    }

    let mut lines = Vec::new();
    for path in paths {
        let file = fs::File::open(&path)?;
        lines.extend(read_labeled_csv(file)?);
    }
    Ok(lines)
}
