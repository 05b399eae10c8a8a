use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::OrderedSet;
use crate::vectorizer::token::TokenFrequency;

/// Corpus-derived stop words: the `k` most frequent raw tokens of the training corpus.
///
/// Serialized as a plain list, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopWords {
    words: OrderedSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts raw tokens across every document (not n-grams) and keeps the `k` most frequent.
    /// Equal counts keep the order in which the tokens were first met.
    ///
    /// # Arguments
    /// * `docs` - token sequences of the training corpus
    /// * `k` - number of stop words
    pub fn derive<T>(docs: &[Vec<T>], k: usize) -> Result<Self>
    where
        T: AsRef<str>,
    {
        if docs.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let mut freq = TokenFrequency::new();
        for doc in docs {
            freq.add_tokens(doc);
        }
        let words = freq
            .sorted_frequency_vector()
            .into_iter()
            .take(k)
            .map(|(token, _)| token.to_string())
            .collect();
        Ok(Self { words })
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.as_str())
    }

    /// Drops stop words from a token sequence, keeping order.
    pub fn remove_from(&self, tokens: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return tokens;
        }
        tokens.into_iter().filter(|token| !self.contains(token)).collect()
    }
}
