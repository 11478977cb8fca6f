//! Line extraction from paginated sources.
//!
//! Converts positioned character records into ordered [`Line`] records:
//! rule-based header/footer cropping, vertical-tolerance line grouping, and
//! left-inset correction, with lexical flags computed per line.

use log::warn;
use unicode_normalization::UnicodeNormalization;

use super::options::LayoutOptions;
use super::source::{Char, Page, PageSource};
use crate::error::Result;
use crate::features::lexical;
use crate::model::Line;

/// Layout extractor producing ordered, flagged lines for a whole document.
pub struct LayoutExtractor {
    options: LayoutOptions,
}

impl LayoutExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self {
            options: LayoutOptions::default(),
        }
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Extract all lines from a source, pages concatenated in page order.
    pub fn extract<S: PageSource>(
        &self,
        source: &S,
        agency: &str,
        meeting_date: &str,
    ) -> Result<Vec<Line>> {
        let pages = source.load_pages()?;
        Ok(self.extract_pages(&pages, agency, meeting_date))
    }

    /// Extract all lines from already-loaded pages.
    ///
    /// `(page_index, line_index)` on the output is strictly increasing in
    /// top-to-bottom, page-ascending reading order; empty lines are never
    /// emitted.
    pub fn extract_pages(&self, pages: &[Page], agency: &str, meeting_date: &str) -> Vec<Line> {
        let mut lines = Vec::new();
        let mut line_index: u32 = 0;

        for (page_index, page) in pages.iter().enumerate() {
            let (top_bound, bottom_bound) = self.crop_bounds(page, page_index);

            // Sort the surviving characters top-to-bottom, left-to-right.
            let mut chars: Vec<&Char> = page
                .chars
                .iter()
                .filter(|c| c.top >= top_bound && c.top <= bottom_bound)
                .collect();
            chars.sort_by(|a, b| {
                (a.top, a.x0)
                    .partial_cmp(&(b.top, b.x0))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            // Group consecutive characters whose tops fall within the
            // tolerance of the current line's anchor; the anchor resets to
            // the first character that falls outside the window.
            let mut group: Vec<&Char> = Vec::new();
            let mut anchor = f32::MIN;
            for c in chars {
                if (c.top - anchor).abs() >= self.options.y_tolerance {
                    if let Some(line) = self.build_line(
                        &group,
                        agency,
                        meeting_date,
                        page_index as u32,
                        line_index,
                    ) {
                        lines.push(line);
                        line_index += 1;
                    }
                    group.clear();
                    anchor = c.top;
                }
                group.push(c);
            }
            if let Some(line) =
                self.build_line(&group, agency, meeting_date, page_index as u32, line_index)
            {
                lines.push(line);
                line_index += 1;
            }
        }

        lines
    }

    /// Determine the vertical band of content to keep on a page.
    ///
    /// The topmost rule within the header search window (half the page on the
    /// first page, which often carries cover boilerplate) delimits the
    /// header; the bottommost rule within the footer window delimits the
    /// footer. Pages with no qualifying rule fall back to fixed defaults.
    pub fn crop_bounds(&self, page: &Page, page_index: usize) -> (f32, f32) {
        let max_header = if page_index == 0 {
            page.height / 2.0
        } else {
            self.options.max_header_height
        };

        let mut header_height = self.options.default_header_height;
        if let Some(topmost) = page
            .rules
            .iter()
            .map(|r| r.top)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            if topmost < max_header {
                header_height = topmost;
            }
        }

        let mut footer_height = 0.0;
        if let Some(bottommost) = page
            .rules
            .iter()
            .map(|r| r.top)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        {
            if page.height - bottommost < self.options.max_footer_height {
                footer_height = page.height - bottommost;
            }
        }

        (header_height, page.height - footer_height)
    }

    /// Assemble one [`Line`] from a group of characters, or `None` when the
    /// group holds no visible text.
    fn build_line(
        &self,
        group: &[&Char],
        agency: &str,
        meeting_date: &str,
        page_index: u32,
        line_index: u32,
    ) -> Option<Line> {
        if group.is_empty() {
            return None;
        }

        let mut ordered: Vec<&Char> = group.to_vec();
        ordered.sort_by(|a, b| a.x0.partial_cmp(&b.x0).unwrap_or(std::cmp::Ordering::Equal));

        let raw: String = ordered.iter().map(|c| c.text.as_str()).collect();
        let text: String = raw.nfkc().collect::<String>().trim().to_string();
        if text.is_empty() {
            return None;
        }

        // Leading spaces are an unreliable geometry signal; take the left
        // inset from the first non-space character instead.
        let first_visible = ordered
            .iter()
            .find(|c| !c.text.trim().is_empty())
            .unwrap_or(&ordered[0]);
        let left_inset = first_visible.x0;

        if !text.starts_with(first_visible.text.trim()) {
            warn!(
                "first-char mismatch on page {page_index}, line {line_index}: char {:?} vs text {:?}",
                first_visible.text, text
            );
        }

        let anchor = ordered[0];
        Some(Line {
            agency: agency.to_string(),
            meeting_date: meeting_date.to_string(),
            page_index,
            line_index,
            is_uppercase: lexical::is_uppercase(&text),
            starts_with_number: lexical::starts_with_number(&text),
            starts_with_subnumber: lexical::starts_with_subnumber(&text),
            starts_with_roman_numeral: lexical::starts_with_roman_numeral(&text),
            starts_with_enum_letter: lexical::starts_with_enum_letter(&text),
            includes_time: lexical::includes_time(&text),
            is_bold: lexical::font_is_bold(&anchor.fontname),
            is_italic: lexical::font_is_italic(&anchor.fontname),
            font_name: anchor.fontname.clone(),
            font_size: anchor.size,
            left_inset,
            text,
        })
    }
}

impl Default for LayoutExtractor {
    fn default() -> Self {
        Self::new()
    }
}
