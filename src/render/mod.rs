//! Output rendering for structured agendas.

mod json;

pub use json::{read_json, to_json, write_json, JsonFormat};
