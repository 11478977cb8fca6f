//! End-to-end pipeline: page source → lines → roles → agenda.
//!
//! A [`AgendaPipeline`] owns a fitted classifier and layout options; it is
//! immutable after construction, so batch runs share it read-only across
//! rayon workers.

use std::path::PathBuf;

use log::info;
use rayon::prelude::*;

use crate::classify::LineClassifier;
use crate::error::Result;
use crate::layout::{JsonSource, LayoutExtractor, LayoutOptions, Page, PageSource};
use crate::model::{Agenda, LabeledLine};
use crate::structure::{build_agenda, StructureWarning};

/// One document to process in a batch run.
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    /// Agency identifier (provenance).
    pub agency: String,
    /// Meeting date string (provenance).
    pub meeting_date: String,
    /// Path to the document's page JSON.
    pub path: PathBuf,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The structured agenda.
    pub agenda: Agenda,
    /// The classified lines the agenda was built from, in document order.
    pub labeled: Vec<LabeledLine>,
    /// Structural warnings raised while building the tree.
    pub warnings: Vec<StructureWarning>,
}

/// The full extraction → classification → structuring pipeline.
pub struct AgendaPipeline {
    extractor: LayoutExtractor,
    classifier: LineClassifier,
}

impl AgendaPipeline {
    /// Build a pipeline around a fitted classifier, with default layout
    /// options.
    pub fn new(classifier: LineClassifier) -> Self {
        Self {
            extractor: LayoutExtractor::new(),
            classifier,
        }
    }

    /// Build a pipeline with custom layout options.
    pub fn with_layout_options(classifier: LineClassifier, options: LayoutOptions) -> Self {
        Self {
            extractor: LayoutExtractor::with_options(options),
            classifier,
        }
    }

    /// The classifier this pipeline runs.
    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Run the pipeline over a page source.
    pub fn run<S: PageSource>(
        &self,
        source: &S,
        agency: &str,
        meeting_date: &str,
    ) -> Result<PipelineOutput> {
        let pages = source.load_pages()?;
        self.run_pages(&pages, agency, meeting_date)
    }

    /// Run the pipeline over already-loaded pages.
    pub fn run_pages(
        &self,
        pages: &[Page],
        agency: &str,
        meeting_date: &str,
    ) -> Result<PipelineOutput> {
        let lines = self.extractor.extract_pages(pages, agency, meeting_date);
        let labeled = self.classifier.classify(&lines)?;
        let (agenda, warnings) = build_agenda(agency, meeting_date, &labeled);
        info!(
            "{agency} {meeting_date}: {} lines, {} sections, {} items, {} warnings",
            labeled.len(),
            agenda.section_count(),
            agenda.item_count(),
            warnings.len()
        );
        Ok(PipelineOutput {
            agenda,
            labeled,
            warnings,
        })
    }

    /// Run a batch of documents in parallel.
    ///
    /// Output order matches request order; one failed document never aborts
    /// the rest of the batch.
    pub fn run_batch(&self, requests: &[DocumentRequest]) -> Vec<Result<PipelineOutput>> {
        requests
            .par_iter()
            .map(|req| {
                let source = JsonSource::new(&req.path);
                self.run(&source, &req.agency, &req.meeting_date)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TrainOptions;
    use crate::layout::Char;
    use crate::model::{Line, Role};

    fn word(text: &str, x0: f32, top: f32, size: f32) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| Char {
                text: c.to_string(),
                x0: x0 + i as f32 * 6.0,
                top,
                size,
                fontname: "Times".to_string(),
            })
            .collect()
    }

    fn training_line(text: &str, font_size: f32, inset: f32, index: u32) -> Line {
        Line {
            agency: "a".to_string(),
            meeting_date: "d".to_string(),
            page_index: 0,
            line_index: index,
            text: text.to_string(),
            font_name: "Times".to_string(),
            font_size,
            left_inset: inset,
            is_uppercase: crate::features::lexical::is_uppercase(text),
            starts_with_number: crate::features::lexical::starts_with_number(text),
            starts_with_subnumber: false,
            starts_with_roman_numeral: crate::features::lexical::starts_with_roman_numeral(text),
            starts_with_enum_letter: crate::features::lexical::starts_with_enum_letter(text),
            includes_time: false,
            is_bold: false,
            is_italic: false,
        }
    }

    /// Heading rows are uppercase at a large size, item headings numbered,
    /// body text plain and indented, same shape the probe pages use below.
    fn trained_classifier() -> LineClassifier {
        let mut labeled = Vec::new();
        let mut index = 0;
        for i in 0..12 {
            labeled.push(LabeledLine::new(
                training_line(&format!("SECTION HEADING {i}"), 16.0, 72.0, index),
                Role::SectionHeading,
            ));
            index += 1;
            labeled.push(LabeledLine::new(
                training_line(&format!("{i}. Item heading number {i}"), 12.0, 90.0, index),
                Role::ItemHeading,
            ));
            index += 1;
            labeled.push(LabeledLine::new(
                training_line(&format!("continuation of the item body text {i}"), 12.0, 110.0, index),
                Role::ItemText,
            ));
            index += 1;
        }
        let options = TrainOptions {
            l2_grid: vec![0.1],
            cv_folds: 3,
            max_epochs: 300,
            ..Default::default()
        };
        LineClassifier::train(&labeled, &options).unwrap()
    }

    #[test]
    fn test_run_pages_end_to_end() {
        let mut chars = word("CONSENT CALENDAR", 72.0, 100.0, 16.0);
        chars.extend(word("3. Approval of Minutes", 90.0, 130.0, 12.0));
        let pages = vec![Page {
            width: 612.0,
            height: 792.0,
            chars,
            rules: vec![],
        }];

        let pipeline = AgendaPipeline::new(trained_classifier());
        let output = pipeline.run_pages(&pages, "gavilan", "04-05-2016").unwrap();

        assert_eq!(output.labeled.len(), 2);
        assert_eq!(output.agenda.agency, "gavilan");
        assert_eq!(output.agenda.section_count(), 1);
        assert_eq!(output.agenda.item_count(), 1);
        let item = &output.agenda.meeting_parts[0].agenda_sections[0].items[0];
        assert_eq!(item.item_number, "3.");
    }

    #[test]
    fn test_run_batch_preserves_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(
            &good,
            r#"[{"width":612.0,"height":792.0,"chars":[],"rules":[]}]"#,
        )
        .unwrap();

        let pipeline = AgendaPipeline::new(trained_classifier());
        let requests = vec![
            DocumentRequest {
                agency: "a".to_string(),
                meeting_date: "d1".to_string(),
                path: good,
            },
            DocumentRequest {
                agency: "a".to_string(),
                meeting_date: "d2".to_string(),
                path: dir.path().join("missing.json"),
            },
        ];

        let results = pipeline.run_batch(&requests);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }
}
