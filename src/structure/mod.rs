//! Agenda structure recovery from classified lines.

mod builder;
mod numbering;

pub use builder::{build_agenda, StructureBuilder, StructureWarning};
pub use numbering::{extract_number, NumberMatch};
