//! Layout extraction: paginated source → ordered [`crate::model::Line`]s.

mod extractor;
mod options;
mod source;

pub use extractor::LayoutExtractor;
pub use options::LayoutOptions;
pub use source::{pages_from_json, pages_from_reader, Char, JsonSource, Page, PageSource, RuleLine};
