//! Feature generation: lexical flags, ranked typographic features, and the
//! frozen [`FeatureSpace`] shared by training and inference.

pub mod lexical;
mod space;
mod vectorizer;

pub use space::{FeatureSpace, INDENT_BUCKETS};
pub use vectorizer::{TermVectorizer, VectorizerOptions};
