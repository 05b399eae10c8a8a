use std::borrow::Cow;
use std::fmt::Debug;

use rust_stemmers::{Algorithm, Stemmer};

/// Reduces an inflected lowercase word to its base form.
///
/// Implementations must not fail: a word they cannot handle comes back unchanged.
pub trait Lemmatizer: Send + Sync + Debug {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str>;
}

/// Snowball stemmer backed lemmatizer (English by default).
pub struct StemmingLemmatizer {
    algorithm: Algorithm,
    stemmer: Stemmer,
}

impl StemmingLemmatizer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            stemmer: Stemmer::create(algorithm),
        }
    }

    pub fn english() -> Self {
        Self::new(Algorithm::English)
    }
}

impl Default for StemmingLemmatizer {
    fn default() -> Self {
        Self::english()
    }
}

impl Debug for StemmingLemmatizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemmingLemmatizer")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Lemmatizer for StemmingLemmatizer {
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        let stemmed = self.stemmer.stem(word);
        // empty or still reducible stems keep the word
        if stemmed.is_empty() || self.stemmer.stem(&stemmed) != stemmed {
            return Cow::Borrowed(word);
        }
        stemmed
    }
}

/// Identity transform, used when lemmatization is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLemmatizer;

impl Lemmatizer for NoLemmatizer {
    #[inline]
    fn lemmatize<'a>(&self, word: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(word)
    }
}
