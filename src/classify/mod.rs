//! Line classification: training tables, the logistic model family, and the
//! fitted multi-class classifier.

mod logistic;
mod model;
mod table;

pub use logistic::{BinaryLogistic, FitConfig};
pub use model::{split_holdout, ClassMetrics, Evaluation, LineClassifier, TrainOptions};
pub use table::{
    read_labeled_csv, read_training_dir, write_labeled_csv, write_lines_csv, LineRecord,
};
