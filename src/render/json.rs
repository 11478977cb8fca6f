//! JSON rendering for structured agendas.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::Agenda;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an agenda to JSON.
pub fn to_json(agenda: &Agenda, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(agenda)?,
        JsonFormat::Compact => serde_json::to_string(agenda)?,
    };
    Ok(json)
}

/// Write an agenda as JSON to a file, creating parent directories as needed.
pub fn write_json(agenda: &Agenda, path: impl AsRef<Path>, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(to_json(agenda, format)?.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read an agenda back from a JSON file.
pub fn read_json(path: impl AsRef<Path>) -> Result<Agenda> {
    let file = File::open(path.as_ref())?;
    let agenda = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(agenda)
}
