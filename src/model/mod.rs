//! Data model types.
//!
//! `Line`/`LabeledLine` are the per-line records flowing through the
//! pipeline; the `Agenda` tree is its durable output.

mod agenda;
mod line;

pub use agenda::{Agenda, AgendaItem, AgendaSection, MeetingPart};
pub use line::{LabeledLine, Line, Role};
