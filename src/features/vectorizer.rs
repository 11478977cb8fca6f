//! Binary n-gram term-presence vectorizer.
//!
//! Fit once on training text, frozen, then transform-only on inference text.
//! Dimensionality is controlled with a fixed stop-word list and document-
//! frequency bounds: terms in almost every line and terms in fewer than a
//! minimum count of lines are dropped.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Words excluded before n-gram construction.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own", "s",
    "same", "she", "should", "so", "some", "such", "t", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your",
];

/// Configuration for [`TermVectorizer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerOptions {
    /// Smallest n-gram order.
    pub ngram_min: usize,
    /// Largest n-gram order.
    pub ngram_max: usize,
    /// Drop terms whose document frequency exceeds this fraction of lines.
    pub max_df: f64,
    /// Drop terms appearing in fewer than this many lines.
    pub min_df: usize,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            ngram_min: 1,
            ngram_max: 3,
            max_df: 0.9,
            min_df: 2,
        }
    }
}

/// Fitted term-presence vectorizer over word n-grams.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermVectorizer {
    options: VectorizerOptions,
    /// Retained terms, lexicographically sorted for determinism.
    vocabulary: Vec<String>,
}

impl TermVectorizer {
    /// Fit a vocabulary over the given texts.
    pub fn fit<S: AsRef<str>>(texts: &[S], options: VectorizerOptions) -> Self {
        // Document frequency per term; BTreeMap keeps the vocabulary sorted.
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            let mut seen: Vec<String> = ngrams(text.as_ref(), &options);
            seen.sort();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        let max_count = (options.max_df * texts.len() as f64).floor() as usize;
        let vocabulary: Vec<String> = df
            .into_iter()
            .filter(|(_, count)| *count >= options.min_df && *count <= max_count)
            .map(|(term, _)| term)
            .collect();

        Self { options, vocabulary }
    }

    /// Number of retained terms (the width of transformed vectors).
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// The retained terms.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Transform a batch of texts into binary term-presence rows.
    pub fn transform<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<f64>> {
        let index: HashMap<&str, usize> = self
            .vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        texts
            .iter()
            .map(|text| {
                let mut row = vec![0.0; self.vocabulary.len()];
                for term in ngrams(text.as_ref(), &self.options) {
                    if let Some(&i) = index.get(term.as_str()) {
                        row[i] = 1.0;
                    }
                }
                row
            })
            .collect()
    }
}

/// Tokenize: ascii-folded lowercase words of two or more characters, with
/// stop words removed before n-gram construction.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| w.len() >= 2)
        .filter(|w| !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// All n-grams of the configured orders, joined with single spaces.
fn ngrams(text: &str, options: &VectorizerOptions) -> Vec<String> {
    let tokens = tokenize(text);
    let mut out = Vec::new();
    for n in options.ngram_min..=options.ngram_max {
        if n == 0 || tokens.len() < n {
            continue;
        }
        for window in tokens.windows(n) {
            out.push(window.join(" "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let tokens = tokenize("Approval of the Minutes (3)");
        assert_eq!(tokens, vec!["approval", "minutes"]);
    }

    #[test]
    fn test_ngrams_orders() {
        let options = VectorizerOptions {
            ngram_min: 1,
            ngram_max: 2,
            ..Default::default()
        };
        let grams = ngrams("public comment period", &options);
        assert!(grams.contains(&"public".to_string()));
        assert!(grams.contains(&"public comment".to_string()));
        assert!(grams.contains(&"comment period".to_string()));
    }

    #[test]
    fn test_fit_applies_df_bounds() {
        let texts = vec![
            "approval minutes",
            "approval warrants",
            "approval budget",
            "approval minutes",
        ];
        let options = VectorizerOptions {
            ngram_min: 1,
            ngram_max: 1,
            max_df: 0.9,
            min_df: 2,
        };
        let vect = TermVectorizer::fit(&texts, options);
        // "approval" appears in 4/4 lines > 0.9 -> dropped; "minutes" in 2 -> kept;
        // "warrants"/"budget" appear once < min_df -> dropped.
        assert_eq!(vect.vocabulary(), ["minutes"]);
    }

    #[test]
    fn test_transform_is_binary_and_frozen() {
        let texts = vec!["roll call", "roll call", "adjournment adjournment"];
        let options = VectorizerOptions {
            ngram_min: 1,
            ngram_max: 2,
            max_df: 1.0,
            min_df: 1,
        };
        let vect = TermVectorizer::fit(&texts, options);
        let rows = vect.transform(&["roll call roll call", "unseen words"]);
        assert_eq!(rows[0].len(), vect.vocabulary_len());
        assert!(rows[0].iter().all(|v| *v == 0.0 || *v == 1.0));
        // Unseen terms map to the zero vector instead of growing the space.
        assert!(rows[1].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_transform_deterministic() {
        let texts = vec!["closed session", "open session"];
        let vect = TermVectorizer::fit(
            &texts,
            VectorizerOptions {
                min_df: 1,
                ..Default::default()
            },
        );
        let a = vect.transform(&["closed session"]);
        let b = vect.transform(&["closed session"]);
        assert_eq!(a, b);
    }
}
