//! The frozen feature space shared by training and inference.
//!
//! Font names and sizes are not comparable across unrelated documents, so
//! the classifier sees *ranked* typographic features: fonts ranked by
//! frequency, sizes ranked by magnitude, and left insets discretized into a
//! small number of indentation buckets. The tables are fitted once on the
//! training corpus and must be reused, never recomputed, at inference time.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::vectorizer::{TermVectorizer, VectorizerOptions};
use crate::model::Line;

/// Number of indentation buckets; the last bucket absorbs every left inset
/// ranked beyond the explicitly ranked ones.
pub const INDENT_BUCKETS: usize = 6;

/// Number of boolean lexical/typographic flags taken directly from a line.
const FLAG_COUNT: usize = 8;

/// Round a layout measurement to a stable integer key (0.1-unit precision),
/// tolerating sub-pixel jitter in offset measurement.
fn measure_key(v: f32) -> i32 {
    (v * 10.0).round() as i32
}

/// Immutable, fitted vocabulary and ranking tables.
///
/// Produced once by [`FeatureSpace::fit`] and passed explicitly into every
/// feature-generation and inference call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpace {
    /// Unique font names, ranked by descending frequency.
    ranked_fonts: Vec<String>,
    /// Unique font-size keys, ranked by descending size.
    ranked_sizes: Vec<i32>,
    /// Unique left-inset keys, ranked ascending (explicit ranks only).
    ranked_insets: Vec<i32>,
    /// Fitted term vectorizer over line text.
    vectorizer: TermVectorizer,
}

impl FeatureSpace {
    /// Fit ranking tables and the term vocabulary on a training corpus.
    pub fn fit(lines: &[Line]) -> Self {
        Self::fit_with_options(lines, VectorizerOptions::default())
    }

    /// Fit with explicit vectorizer options.
    pub fn fit_with_options(lines: &[Line], options: VectorizerOptions) -> Self {
        // Fonts by descending frequency; name ascending on ties so the
        // ranking is deterministic.
        let mut font_counts: HashMap<&str, usize> = HashMap::new();
        for line in lines {
            *font_counts.entry(line.font_name.as_str()).or_insert(0) += 1;
        }
        let mut ranked_fonts: Vec<(&str, usize)> = font_counts.into_iter().collect();
        ranked_fonts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let ranked_fonts: Vec<String> = ranked_fonts.into_iter().map(|(f, _)| f.to_string()).collect();

        let mut ranked_sizes: Vec<i32> = lines.iter().map(|l| measure_key(l.font_size)).collect();
        ranked_sizes.sort_unstable_by(|a, b| b.cmp(a));
        ranked_sizes.dedup();

        let mut ranked_insets: Vec<i32> = lines.iter().map(|l| measure_key(l.left_inset)).collect();
        ranked_insets.sort_unstable();
        ranked_insets.dedup();
        ranked_insets.truncate(INDENT_BUCKETS - 1);

        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        let vectorizer = TermVectorizer::fit(&texts, options);

        Self {
            ranked_fonts,
            ranked_sizes,
            ranked_insets,
            vectorizer,
        }
    }

    /// Width of the structural feature vector.
    pub fn structural_len(&self) -> usize {
        FLAG_COUNT + self.ranked_fonts.len() + self.ranked_sizes.len() + INDENT_BUCKETS
    }

    /// Width of the term-presence vector.
    pub fn term_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Total feature width seen by the classifier.
    pub fn feature_len(&self) -> usize {
        self.structural_len() + self.term_len()
    }

    /// Indentation bucket for a left inset: the rank of the inset among the
    /// fitted insets, with unseen/overflow insets falling into the last
    /// bucket.
    pub fn indent_bucket(&self, left_inset: f32) -> usize {
        let key = measure_key(left_inset);
        self.ranked_insets
            .iter()
            .position(|k| *k == key)
            .unwrap_or(INDENT_BUCKETS - 1)
    }

    /// Structural (boolean/categorical) features for one line.
    ///
    /// Deterministic and transform-only: re-running on an unchanged line
    /// with the same fitted space yields an identical vector.
    pub fn featurize(&self, line: &Line) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.structural_len());

        for flag in [
            line.is_uppercase,
            line.starts_with_number,
            line.starts_with_subnumber,
            line.starts_with_roman_numeral,
            line.starts_with_enum_letter,
            line.includes_time,
            line.is_bold,
            line.is_italic,
        ] {
            row.push(if flag { 1.0 } else { 0.0 });
        }

        // One boolean per rank slot: the line's font matches rank-0,
        // rank-1, ... or none of them.
        for font in &self.ranked_fonts {
            row.push(if *font == line.font_name { 1.0 } else { 0.0 });
        }
        let size_key = measure_key(line.font_size);
        for size in &self.ranked_sizes {
            row.push(if *size == size_key { 1.0 } else { 0.0 });
        }

        let bucket = self.indent_bucket(line.left_inset);
        for i in 0..INDENT_BUCKETS {
            row.push(if i == bucket { 1.0 } else { 0.0 });
        }

        row
    }

    /// Term-presence rows for a batch of lines.
    pub fn vectorize_text(&self, lines: &[Line]) -> Vec<Vec<f64>> {
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        self.vectorizer.transform(&texts)
    }

    /// Full feature rows (structural + term presence) for a batch of lines.
    pub fn feature_rows(&self, lines: &[Line]) -> Vec<Vec<f64>> {
        let term_rows = self.vectorize_text(lines);
        lines
            .iter()
            .zip(term_rows)
            .map(|(line, terms)| {
                let mut row = self.featurize(line);
                row.extend(terms);
                row
            })
            .collect()
    }
}
