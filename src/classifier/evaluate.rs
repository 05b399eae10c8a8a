use serde::Serialize;

use crate::classifier::RatingClassifier;
use crate::error::{Error, Result};
use crate::vectorizer::FeatureMatrix;

/// Held-out scores of a classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// share of rows predicted exactly
    pub accuracy: f64,
    /// every label seen as truth or prediction, ascending
    pub labels: Vec<u8>,
    /// `confusion[truth][predicted]`, both indexed through `labels`
    pub confusion: Vec<Vec<usize>>,
    /// per label, in `labels` order
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub f1: Vec<f64>,
    /// unweighted means over `labels`
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

/// `num / den`, 0 when nothing was counted
#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[inline]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl Evaluation {
    /// Build from true and predicted labels of equal length.
    pub fn from_predictions(truth: &[u8], predicted: &[u8]) -> Result<Self> {
        if truth.len() != predicted.len() {
            return Err(Error::DimensionMismatch {
                expected: truth.len(),
                found: predicted.len(),
            });
        }
        if truth.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut labels: Vec<u8> = truth.iter().chain(predicted).copied().collect();
        labels.sort_unstable();
        labels.dedup();

        let mut confusion = vec![vec![0; labels.len()]; labels.len()];
        let mut correct = 0;
        for (&t, &p) in truth.iter().zip(predicted) {
            // labels holds both, the searches cannot miss
            let (Ok(ti), Ok(pi)) = (labels.binary_search(&t), labels.binary_search(&p)) else {
                continue;
            };
            confusion[ti][pi] += 1;
            if t == p {
                correct += 1;
            }
        }

        let n = labels.len();
        let precision: Vec<f64> = (0..n)
            .map(|j| ratio(confusion[j][j], (0..n).map(|i| confusion[i][j]).sum()))
            .collect();
        let recall: Vec<f64> = (0..n)
            .map(|i| ratio(confusion[i][i], confusion[i].iter().sum()))
            .collect();
        let f1: Vec<f64> = precision
            .iter()
            .zip(&recall)
            .map(|(&p, &r)| if p + r == 0.0 { 0.0 } else { 2.0 * p * r / (p + r) })
            .collect();
        Ok(Self {
            accuracy: ratio(correct, truth.len()),
            macro_precision: mean(&precision),
            macro_recall: mean(&recall),
            macro_f1: mean(&f1),
            labels,
            confusion,
            precision,
            recall,
            f1,
        })
    }
}

/// Predict every row of `x` and score against `y`.
pub fn evaluate<C>(classifier: &C, x: &FeatureMatrix, y: &[u8]) -> Result<Evaluation>
where
    C: RatingClassifier + Sync,
{
    let predicted = classifier.predict_all(x)?;
    let evaluation = Evaluation::from_predictions(y, &predicted)?;
    log::info!("accuracy {:.4} on {} rows", evaluation.accuracy, y.len());
    Ok(evaluation)
}
