//! # gavel
//!
//! Document-structure recovery for government meeting agendas.
//!
//! This library turns flat, paginated agenda documents into a structured
//! tree of meeting parts, sections, and items. It runs in three stages:
//! layout extraction (positioned characters → ordered lines), line
//! classification (a trained one-vs-rest logistic model assigns each line a
//! structural role), and structure building (a state machine assembles the
//! agenda tree and extracts numbering).
//!
//! ## Quick Start
//!
//! ```no_run
//! use gavel::{AgendaPipeline, JsonSource, LineClassifier};
//!
//! fn main() -> gavel::Result<()> {
//!     let classifier = LineClassifier::load_path("model.json")?;
//!     let pipeline = AgendaPipeline::new(classifier);
//!
//!     let source = JsonSource::new("gavilan_04-05-2016.json");
//!     let output = pipeline.run(&source, "gavilan", "04-05-2016")?;
//!     println!("{} items", output.agenda.item_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout extraction**: rule-based header/footer cropping, vertical
//!   line grouping, left-inset correction
//! - **Line classification**: five structural roles, trained on labeled
//!   CSV corpora with cross-validated regularization
//! - **Structure building**: meeting → section → item tree with numbering
//!   extraction and recoverable structural warnings
//! - **Parallel batches**: Rayon-backed processing of document sets

pub mod classify;
pub mod error;
pub mod features;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod structure;

// Re-export commonly used types
pub use classify::{
    read_labeled_csv, read_training_dir, split_holdout, write_labeled_csv, write_lines_csv,
    Evaluation, LineClassifier, LineRecord, TrainOptions,
};
pub use error::{Error, Result};
pub use features::{FeatureSpace, VectorizerOptions};
pub use layout::{JsonSource, LayoutExtractor, LayoutOptions, Page, PageSource};
pub use model::{Agenda, AgendaItem, AgendaSection, LabeledLine, Line, MeetingPart, Role};
pub use pipeline::{AgendaPipeline, DocumentRequest, PipelineOutput};
pub use render::JsonFormat;
pub use structure::{build_agenda, StructureWarning};

use std::path::Path;

/// Extract the ordered lines of a page-dump JSON file.
///
/// # Example
///
/// ```no_run
/// use gavel::extract_lines;
///
/// let lines = extract_lines("pages.json", "gavilan", "04-05-2016").unwrap();
/// println!("{} lines", lines.len());
/// ```
pub fn extract_lines<P: AsRef<Path>>(
    path: P,
    agency: &str,
    meeting_date: &str,
) -> Result<Vec<Line>> {
    let source = JsonSource::new(path);
    LayoutExtractor::new().extract(&source, agency, meeting_date)
}

/// Extract lines with custom layout options.
pub fn extract_lines_with_options<P: AsRef<Path>>(
    path: P,
    agency: &str,
    meeting_date: &str,
    options: LayoutOptions,
) -> Result<Vec<Line>> {
    let source = JsonSource::new(path);
    LayoutExtractor::with_options(options).extract(&source, agency, meeting_date)
}

/// Run the full pipeline on one page-dump file with a persisted model.
///
/// Convenience wrapper: load the model, extract, classify, build.
pub fn structure_file<P: AsRef<Path>, M: AsRef<Path>>(
    path: P,
    model_path: M,
    agency: &str,
    meeting_date: &str,
) -> Result<PipelineOutput> {
    let classifier = LineClassifier::load_path(model_path)?;
    let pipeline = AgendaPipeline::new(classifier);
    let source = JsonSource::new(path);
    pipeline.run(&source, agency, meeting_date)
}
