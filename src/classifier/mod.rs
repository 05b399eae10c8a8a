pub mod evaluate;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use crate::utils::math::vector::ZeroSpVec;
use crate::vectorizer::FeatureMatrix;

pub use evaluate::{evaluate, Evaluation};

/// star ratings accepted as labels
pub const RATINGS: std::ops::RangeInclusive<u8> = 1..=5;

/// Anything that learns ratings from TF-IDF rows.
pub trait RatingClassifier {
    /// # Arguments
    /// * `x` - one row per review
    /// * `y` - rating of each row, `1..=5`
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()>;

    /// Rating for one projected review.
    fn predict(&self, x: &ZeroSpVec<f64>) -> Result<u8>;

    /// Ratings for every row, in parallel.
    fn predict_all(&self, x: &FeatureMatrix) -> Result<Vec<u8>>
    where
        Self: Sync,
    {
        x.rows().par_iter().map(|row| self.predict(row)).collect()
    }
}

/// One-vs-rest linear SVM trained with plain SGD (hinge loss, L2 penalty).
///
/// Each class keeps a dense weight row of vocabulary width plus a bias.
/// Training is deterministic for a given seed: the epoch order is drawn up front
/// and the per-class problems share it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSgdClassifier {
    config: ClassifierConfig,
    /// ascending
    classes: Vec<u8>,
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl LinearSgdClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classes: Vec::new(),
            weights: Vec::new(),
            biases: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    #[inline]
    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    #[inline]
    pub fn is_trained(&self) -> bool {
        !self.classes.is_empty()
    }

    /// feature width, 0 before training
    #[inline]
    pub fn n_features(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Raw decision values, one per class in `classes()` order.
    pub fn decision_function(&self, x: &ZeroSpVec<f64>) -> Result<Vec<f64>> {
        if !self.is_trained() {
            return Err(Error::NotTrained);
        }
        if x.len() != self.n_features() {
            return Err(Error::DimensionMismatch {
                expected: self.n_features(),
                found: x.len(),
            });
        }
        Ok(self
            .weights
            .iter()
            .zip(&self.biases)
            .map(|(w, b)| x.dot_dense::<f64>(w) + b)
            .collect())
    }

    /// Checks a deserialized classifier against the feature width it will see.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        let malformed = |msg: String| Err(Error::MalformedModel(msg));
        if self.config.validate().is_err() {
            return malformed(format!("classifier config {:?} is out of range", self.config));
        }
        if self.classes.is_empty() {
            return malformed("classifier has no classes".into());
        }
        if !self.classes.windows(2).all(|w| w[0] < w[1]) {
            return malformed("classifier classes are not strictly ascending".into());
        }
        if let Some(bad) = self.classes.iter().find(|&&c| !RATINGS.contains(&c)) {
            return malformed(format!("classifier class {bad} is not a rating"));
        }
        if self.weights.len() != self.classes.len() || self.biases.len() != self.classes.len() {
            return malformed("classifier weights and classes differ in length".into());
        }
        if let Some(row) = self.weights.iter().find(|row| row.len() != n_features) {
            return malformed(format!("classifier expects {} features, vocabulary has {n_features}", row.len()));
        }
        let finite = self.weights.iter().flatten().chain(&self.biases).all(|v| v.is_finite());
        if !finite {
            return malformed("classifier holds non-finite weights".into());
        }
        Ok(())
    }

    /// shuffled row order for every epoch
    fn epoch_orders(&self, n_rows: usize) -> Vec<Vec<usize>> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        (0..self.config.epochs)
            .map(|_| {
                let mut order: Vec<usize> = (0..n_rows).collect();
                order.shuffle(&mut rng);
                order
            })
            .collect()
    }
}

impl RatingClassifier for LinearSgdClassifier {
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<()> {
        if x.n_rows() == 0 {
            return Err(Error::EmptyCorpus);
        }
        if x.n_rows() != y.len() {
            return Err(Error::DimensionMismatch {
                expected: x.n_rows(),
                found: y.len(),
            });
        }
        if let Some(&bad) = y.iter().find(|&&c| !RATINGS.contains(&c)) {
            return Err(Error::InvalidRating(bad as i64));
        }
        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();

        let orders = self.epoch_orders(x.n_rows());
        let alpha = self.config.alpha;
        let trained: Vec<(Vec<f64>, f64)> = classes
            .par_iter()
            .map(|&class| {
                let targets: Vec<f64> = y.iter().map(|&label| if label == class { 1.0 } else { -1.0 }).collect();
                train_binary(x, &targets, &orders, alpha)
            })
            .collect();
        log::info!(
            "trained {} one-vs-rest models on {} rows x {} features",
            classes.len(),
            x.n_rows(),
            x.n_cols()
        );

        let (weights, biases): (Vec<Vec<f64>>, Vec<f64>) = trained.into_iter().unzip();
        self.classes = classes;
        self.weights = weights;
        self.biases = biases;
        Ok(())
    }

    fn predict(&self, x: &ZeroSpVec<f64>) -> Result<u8> {
        let scores = self.decision_function(x)?;
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            // strict, so ties stay with the lower rating
            if *score > scores[best] {
                best = idx;
            }
        }
        Ok(self.classes[best])
    }
}

/// Hinge-loss SGD for one binary problem, targets in `{-1, 1}`.
///
/// The weight vector is kept as `scale * v` so the L2 decay step is O(1) per row.
fn train_binary(x: &FeatureMatrix, targets: &[f64], orders: &[Vec<usize>], alpha: f64) -> (Vec<f64>, f64) {
    let mut v = vec![0.0; x.n_cols()];
    let mut scale = 1.0;
    let mut bias = 0.0;
    let mut t = 1.0;
    for order in orders {
        for &i in order {
            let row = &x.rows()[i];
            let y = targets[i];
            let eta = 1.0 / (alpha * t + 1.0);
            let margin = y * (scale * row.dot_dense::<f64>(&v) + bias);
            // eta * alpha < 1, scale stays positive
            scale *= 1.0 - eta * alpha;
            if margin < 1.0 {
                let step = eta * y / scale;
                for (j, val) in row.raw_iter() {
                    v[j] += step * val;
                }
                bias += eta * y;
            }
            if scale < 1e-9 {
                v.iter_mut().for_each(|w| *w *= scale);
                scale = 1.0;
            }
            t += 1.0;
        }
    }
    v.iter_mut().for_each(|w| *w *= scale);
    (v, bias)
}
