//! The line classifier: one-vs-rest logistic regression over structural and
//! term-presence features.
//!
//! Training fits the [`FeatureSpace`] and five binary models (one per role);
//! the L2 strength is chosen by k-fold cross-validation. A fitted classifier
//! is immutable and safe to share read-only across worker threads.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::logistic::{BinaryLogistic, FitConfig};
use crate::error::{Error, Result};
use crate::features::{FeatureSpace, VectorizerOptions};
use crate::model::{LabeledLine, Line, Role};

/// Training settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOptions {
    /// L2 strengths tried during cross-validation, in preference order.
    pub l2_grid: Vec<f64>,
    /// Number of cross-validation folds.
    pub cv_folds: usize,
    /// Seed for the fold shuffle, making training reproducible.
    pub seed: u64,
    /// Term-vectorizer settings.
    pub vectorizer: VectorizerOptions,
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// Maximum gradient-descent passes per binary fit.
    pub max_epochs: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            l2_grid: vec![0.01, 0.1, 1.0, 10.0],
            cv_folds: 5,
            seed: 42,
            vectorizer: VectorizerOptions::default(),
            learning_rate: 0.5,
            max_epochs: 500,
        }
    }
}

/// A fitted multi-class line classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineClassifier {
    space: FeatureSpace,
    /// One binary model per role, in [`Role::ALL`] order.
    models: Vec<BinaryLogistic>,
    /// The L2 strength cross-validation selected.
    selected_l2: f64,
}

impl LineClassifier {
    /// Train on a labeled corpus.
    ///
    /// Fails when the corpus is empty or contains a single role only.
    pub fn train(labeled: &[LabeledLine], options: &TrainOptions) -> Result<Self> {
        if labeled.is_empty() {
            return Err(Error::Training("empty training set".to_string()));
        }
        let mut roles: Vec<Role> = labeled.iter().map(|l| l.role).collect();
        roles.sort_by_key(|r| r.priority());
        roles.dedup();
        if roles.len() < 2 {
            return Err(Error::Training(format!(
                "training set contains a single role ({}); need at least two",
                roles[0]
            )));
        }

        let lines: Vec<Line> = labeled.iter().map(|l| l.line.clone()).collect();
        let space = FeatureSpace::fit_with_options(&lines, options.vectorizer.clone());
        let x = design_matrix(&space, &lines)?;
        let y: Vec<Role> = labeled.iter().map(|l| l.role).collect();

        let selected_l2 = select_l2(&x, &y, options);
        info!(
            "training line classifier: {} rows, {} features, l2={selected_l2}",
            x.nrows(),
            x.ncols()
        );

        let config = FitConfig {
            l2: selected_l2,
            learning_rate: options.learning_rate,
            max_epochs: options.max_epochs,
            ..Default::default()
        };
        let models = fit_one_vs_rest(x.view(), &y, &config);

        Ok(Self {
            space,
            models,
            selected_l2,
        })
    }

    /// The frozen feature space this classifier was fitted with.
    pub fn feature_space(&self) -> &FeatureSpace {
        &self.space
    }

    /// The L2 strength selected by cross-validation.
    pub fn selected_l2(&self) -> f64 {
        self.selected_l2
    }

    /// Per-role probability scores for a batch of lines, in [`Role::ALL`]
    /// order.
    pub fn predict_scores(&self, lines: &[Line]) -> Result<Vec<[f64; 5]>> {
        let x = design_matrix(&self.space, lines)?;
        let mut scores = vec![[0.0; 5]; lines.len()];
        for (ri, model) in self.models.iter().enumerate() {
            let p = model.predict_proba(x.view());
            for (row, pi) in p.iter().enumerate() {
                scores[row][ri] = *pi;
            }
        }
        Ok(scores)
    }

    /// Classify a batch of lines: arg-max class score, exact ties broken by
    /// the fixed role priority order (meeting_heading strongest).
    pub fn classify(&self, lines: &[Line]) -> Result<Vec<LabeledLine>> {
        let scores = self.predict_scores(lines)?;
        Ok(lines
            .iter()
            .zip(scores)
            .map(|(line, row)| LabeledLine::new(line.clone(), argmax_role(&row)))
            .collect())
    }

    /// Serialize the fitted model as JSON.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Write the fitted model to a file.
    pub fn save_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.save(BufWriter::new(File::create(path)?))
    }

    /// Load a fitted model from JSON.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let model: Self = serde_json::from_reader(reader)?;
        if model.models.len() != Role::ALL.len() {
            return Err(Error::Model(format!(
                "persisted model has {} binary models, expected {}",
                model.models.len(),
                Role::ALL.len()
            )));
        }
        Ok(model)
    }

    /// Load a fitted model from a file.
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load(BufReader::new(File::open(path)?))
    }

    /// Score predictions against ground truth (diagnostics only).
    pub fn evaluate(&self, labeled: &[LabeledLine]) -> Result<Evaluation> {
        let lines: Vec<Line> = labeled.iter().map(|l| l.line.clone()).collect();
        let predicted = self.classify(&lines)?;
        let pairs: Vec<(Role, Role)> = labeled
            .iter()
            .zip(&predicted)
            .map(|(truth, pred)| (truth.role, pred.role))
            .collect();
        Ok(Evaluation::from_pairs(&pairs))
    }
}

/// Pick the arg-max role; on exact ties the earlier (higher-priority) role
/// wins because only a strictly greater score replaces the current best.
fn argmax_role(scores: &[f64; 5]) -> Role {
    let mut best = 0;
    for (i, s) in scores.iter().enumerate().skip(1) {
        if *s > scores[best] {
            best = i;
        }
    }
    Role::ALL[best]
}

/// Build the design matrix [structural | term presence] for a line batch.
fn design_matrix(space: &FeatureSpace, lines: &[Line]) -> Result<Array2<f64>> {
    let rows = space.feature_rows(lines);
    let d = space.feature_len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((lines.len(), d), flat)
        .map_err(|e| Error::Model(format!("inconsistent feature width: {e}")))
}

/// Fit one binary model per role (one-vs-rest), in [`Role::ALL`] order.
fn fit_one_vs_rest(
    x: ndarray::ArrayView2<'_, f64>,
    y: &[Role],
    config: &FitConfig,
) -> Vec<BinaryLogistic> {
    Role::ALL
        .iter()
        .map(|role| {
            let targets: Vec<f64> = y.iter().map(|r| if r == role { 1.0 } else { 0.0 }).collect();
            BinaryLogistic::fit(x, ArrayView1::from(targets.as_slice()), config)
        })
        .collect()
}

/// Choose the L2 strength by k-fold cross-validated accuracy.
///
/// Small corpora (fewer than two rows per fold) skip the search and use the
/// middle of the grid.
fn select_l2(x: &Array2<f64>, y: &[Role], options: &TrainOptions) -> f64 {
    let n = x.nrows();
    let folds = options.cv_folds.max(2);
    if options.l2_grid.is_empty() {
        return FitConfig::default().l2;
    }
    if n < folds * 2 {
        let fallback = options.l2_grid[options.l2_grid.len() / 2];
        debug!("training set too small for {folds}-fold CV, using l2={fallback}");
        return fallback;
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);
    indices.shuffle(&mut rng);

    let mut best = (options.l2_grid[0], f64::MIN);
    for &l2 in &options.l2_grid {
        let config = FitConfig {
            l2,
            learning_rate: options.learning_rate,
            max_epochs: options.max_epochs,
            ..Default::default()
        };

        let mut correct = 0usize;
        let mut total = 0usize;
        for fold in 0..folds {
            let holdout: Vec<usize> = indices
                .iter()
                .copied()
                .skip(fold)
                .step_by(folds)
                .collect();
            let train: Vec<usize> = indices
                .iter()
                .copied()
                .filter(|i| !holdout.contains(i))
                .collect();

            let x_train = x.select(ndarray::Axis(0), &train);
            let y_train: Vec<Role> = train.iter().map(|&i| y[i]).collect();
            let models = fit_one_vs_rest(x_train.view(), &y_train, &config);

            let x_test = x.select(ndarray::Axis(0), &holdout);
            let probs: Vec<_> = models.iter().map(|m| m.predict_proba(x_test.view())).collect();
            for (row, &i) in holdout.iter().enumerate() {
                let mut scores = [0.0; 5];
                for (ri, p) in probs.iter().enumerate() {
                    scores[ri] = p[row];
                }
                if argmax_role(&scores) == y[i] {
                    correct += 1;
                }
                total += 1;
            }
        }

        let accuracy = correct as f64 / total.max(1) as f64;
        debug!("cv: l2={l2} accuracy={accuracy:.4}");
        if accuracy > best.1 {
            best = (l2, accuracy);
        }
    }
    best.0
}

/// Shuffle and split a labeled corpus into (train, holdout) for evaluation.
pub fn split_holdout(
    labeled: &[LabeledLine],
    holdout_fraction: f64,
    seed: u64,
) -> (Vec<LabeledLine>, Vec<LabeledLine>) {
    let mut shuffled: Vec<LabeledLine> = labeled.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let holdout_len = ((labeled.len() as f64) * holdout_fraction).round() as usize;
    let holdout_len = holdout_len.min(labeled.len());
    let holdout = shuffled.split_off(labeled.len() - holdout_len);
    (shuffled, holdout)
}

/// Accuracy and per-class precision/recall over a prediction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// Fraction of lines whose predicted role matches the truth.
    pub accuracy: f64,
    /// Per-role metrics, in [`Role::ALL`] order.
    pub classes: Vec<ClassMetrics>,
}

/// Precision/recall for one role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub role: Role,
    pub precision: f64,
    pub recall: f64,
    /// Number of ground-truth lines with this role.
    pub support: usize,
}

impl Evaluation {
    /// Compute metrics from (truth, predicted) role pairs.
    pub fn from_pairs(pairs: &[(Role, Role)]) -> Self {
        let total = pairs.len().max(1);
        let correct = pairs.iter().filter(|(t, p)| t == p).count();

        let classes = Role::ALL
            .iter()
            .map(|&role| {
                let tp = pairs.iter().filter(|(t, p)| *t == role && *p == role).count();
                let predicted = pairs.iter().filter(|(_, p)| *p == role).count();
                let support = pairs.iter().filter(|(t, _)| *t == role).count();
                ClassMetrics {
                    role,
                    precision: tp as f64 / predicted.max(1) as f64,
                    recall: tp as f64 / support.max(1) as f64,
                    support,
                }
            })
            .collect();

        Self {
            accuracy: correct as f64 / total as f64,
            classes,
        }
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "{:<18} {:>9} {:>9} {:>8}", "role", "precision", "recall", "support")?;
        for c in &self.classes {
            writeln!(
                f,
                "{:<18} {:>9.4} {:>9.4} {:>8}",
                c.role.as_str(),
                c.precision,
                c.recall,
                c.support
            )?;
        }
        Ok(())
    }
}
