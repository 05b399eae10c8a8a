use std::io::Read;
use std::path::Path;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Deserialize;

use crate::classifier::RATINGS;
use crate::error::{Error, Result};

/// Reviews shorter than this are refused at prediction time.
pub const MIN_TEXT_LEN: usize = 50;

/// One labelled review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct ReviewRecord {
    #[serde(rename = "Rating")]
    rating: i64,
    #[serde(rename = "Text")]
    text: String,
}

impl TryFrom<ReviewRecord> for Review {
    type Error = Error;

    fn try_from(record: ReviewRecord) -> Result<Self> {
        match u8::try_from(record.rating) {
            Ok(rating) if RATINGS.contains(&rating) => Ok(Review { rating, text: record.text }),
            _ => Err(Error::InvalidRating(record.rating)),
        }
    }
}

/// Read reviews from CSV with `Rating` and `Text` columns (other columns are ignored).
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Review>> {
    let path = path.as_ref();
    let reviews = read_csv(csv::Reader::from_path(path)?)?;
    log::info!("loaded {} reviews from {}", reviews.len(), path.display());
    Ok(reviews)
}

/// Same as [`load_csv`] over any reader.
pub fn read_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Vec<Review>> {
    reader
        .deserialize::<ReviewRecord>()
        .map(|record| Review::try_from(record?))
        .collect()
}

/// Shuffle with `seed` and split: the first `round(len * (1 - test_fraction))`
/// reviews train, the rest test.
pub fn train_test_split(mut reviews: Vec<Review>, test_fraction: f64, seed: u64) -> Result<(Vec<Review>, Vec<Review>)> {
    if !(0.0..1.0).contains(&test_fraction) {
        return Err(Error::InvalidConfig(format!("test_fraction must be in [0, 1), got {test_fraction}")));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    reviews.shuffle(&mut rng);
    let n_train = (reviews.len() as f64 * (1.0 - test_fraction)).round() as usize;
    let test = reviews.split_off(n_train.min(reviews.len()));
    log::debug!("split into {} train and {} test reviews", reviews.len(), test.len());
    Ok((reviews, test))
}

/// Refuse texts below [`MIN_TEXT_LEN`] characters.
pub fn check_text_len(text: &str) -> Result<()> {
    let len = text.chars().count();
    if len < MIN_TEXT_LEN {
        return Err(Error::TextTooShort { len, min: MIN_TEXT_LEN });
    }
    Ok(())
}
