//! Paginated-source abstraction.
//!
//! The extractor only needs, per page, the positioned character records and
//! the ruled-line geometry. Any PDF text-layer library can populate these
//! records; [`JsonSource`] reads them from a pdfplumber-style JSON dump so
//! the concrete PDF library stays outside the crate boundary.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A positioned character (glyph) record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Char {
    /// Character text (usually a single glyph).
    pub text: String,
    /// Left edge, in layout units from the page's left edge.
    pub x0: f32,
    /// Top edge, in layout units from the page's top edge.
    pub top: f32,
    /// Font size in layout units.
    pub size: f32,
    /// Font name (e.g. "Helvetica-Bold").
    pub fontname: String,
}

/// A ruled horizontal line on the page (thin rule geometry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleLine {
    /// Left end of the rule.
    pub x0: f32,
    /// Right end of the rule.
    pub x1: f32,
    /// Vertical position, in layout units from the page's top edge.
    pub top: f32,
}

/// One page of a paginated source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page width in layout units.
    pub width: f32,
    /// Page height in layout units.
    pub height: f32,
    /// Positioned character records, in source order.
    #[serde(default)]
    pub chars: Vec<Char>,
    /// Ruled-line geometry records.
    #[serde(default)]
    pub rules: Vec<RuleLine>,
}

/// Abstract interface for paginated document access.
///
/// Implementations enumerate pages with their character and rule records,
/// without exposing any concrete document library types.
pub trait PageSource {
    /// Load all pages of the document, in page order.
    fn load_pages(&self) -> Result<Vec<Page>>;
}

impl PageSource for Vec<Page> {
    fn load_pages(&self) -> Result<Vec<Page>> {
        Ok(self.clone())
    }
}

/// [`PageSource`] backed by a JSON page dump on disk.
pub struct JsonSource {
    path: PathBuf,
}

impl JsonSource {
    /// Create a source reading from the given file path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PageSource for JsonSource {
    fn load_pages(&self) -> Result<Vec<Page>> {
        let file = File::open(&self.path)?;
        pages_from_reader(BufReader::new(file))
    }
}

/// Parse a page dump from any reader.
pub fn pages_from_reader<R: Read>(reader: R) -> Result<Vec<Page>> {
    serde_json::from_reader(reader).map_err(|e| Error::Source(format!("invalid page dump: {e}")))
}

/// Parse a page dump from a JSON string.
pub fn pages_from_json(json: &str) -> Result<Vec<Page>> {
    serde_json::from_str(json).map_err(|e| Error::Source(format!("invalid page dump: {e}")))
}
