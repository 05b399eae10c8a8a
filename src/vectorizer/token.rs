use serde::{Deserialize, Serialize};

use crate::utils::OrderedMap;
use crate::vectorizer::tfidf::TFIDFEngine;

/// TokenFrequency
/// Counts how often each token (or n-gram) occurs in one document.
///
/// Tokens keep first-seen order, which gives the stable tie-break used for
/// stop words and vocabulary ordering.
///
/// # Examples
/// ```
/// use rating_tf_idf_vectorizer::TokenFrequency;
/// let mut token_freq = TokenFrequency::new();
/// token_freq.add_tokens(&["good", "food", "good"]);
///
/// assert_eq!(token_freq.token_count("good"), 2);
/// assert_eq!(token_freq.most_frequent_token_count(), 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TokenFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    token_count: OrderedMap<String, u32>,
    total_token_count: u64,
}

/// adding tokens
impl TokenFrequency {
    pub fn new() -> Self {
        TokenFrequency {
            token_count: OrderedMap::default(),
            total_token_count: 0,
        }
    }

    /// Counts every element of `tokens`.
    pub fn from_tokens<T>(tokens: &[T]) -> Self
    where T: AsRef<str>
    {
        let mut freq = Self::new();
        freq.add_tokens(tokens);
        freq
    }

    /// tokenを追加する
    ///
    /// # Arguments
    /// * `token` - token to count
    #[inline]
    pub fn add_token(&mut self, token: &str) -> &mut Self {
        if let Some(count) = self.token_count.get_mut(token) {
            *count += 1;
        } else {
            self.token_count.insert(token.to_string(), 1);
        }
        self.total_token_count += 1;
        self
    }

    /// 複数のtokenを追加する
    ///
    /// # Arguments
    /// * `tokens` - tokens to count
    #[inline]
    pub fn add_tokens<T>(&mut self, tokens: &[T]) -> &mut Self
    where T: AsRef<str>
    {
        for token in tokens {
            self.add_token(token.as_ref());
        }
        self
    }
}

/// TF calculation
impl TokenFrequency {
    /// Term frequency of every distinct token, in first-seen order.
    /// The maximum count is local to this document.
    ///
    /// # Returns
    /// * `Vec<(&str, f64)>` - token and its tf
    #[inline]
    pub fn tf_vector_ref_str<E>(&self) -> Vec<(&str, f64)>
    where E: TFIDFEngine
    {
        let max_count = self.most_frequent_token_count();
        self.token_count
            .iter()
            .map(|(token, &count)| (token.as_str(), E::tf_calc(max_count, count)))
            .collect()
    }
}

/// statistics
impl TokenFrequency {
    /// total number of counted tokens, duplicates included
    #[inline]
    pub fn token_total_count(&self) -> u64 {
        self.total_token_count
    }

    #[inline]
    pub fn token_count(&self, token: &str) -> u32 {
        self.token_count.get(token).copied().unwrap_or(0)
    }

    /// もっとも多く出現したtokenの出現回数
    /// `0` for an empty document
    #[inline]
    pub fn most_frequent_token_count(&self) -> u32 {
        self.token_count.values().copied().max().unwrap_or(0)
    }

    /// distinct tokens in first-seen order
    #[inline]
    pub fn token_set_ref_str(&self) -> Vec<&str> {
        self.token_count.keys().map(|s| s.as_str()).collect()
    }

    /// number of distinct tokens
    #[inline]
    pub fn token_num(&self) -> usize {
        self.token_count.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.token_count.is_empty()
    }

    /// Tokens sorted by count, descending.
    /// The sort is stable, so equal counts keep first-seen order.
    ///
    /// # Returns
    /// * `Vec<(&str, u32)>` - token and its count
    #[inline]
    pub fn sorted_frequency_vector(&self) -> Vec<(&str, u32)> {
        let mut token_list: Vec<(&str, u32)> = self.token_count
            .iter()
            .map(|(token, &count)| (token.as_str(), count))
            .collect();

        token_list.sort_by(|a, b| b.1.cmp(&a.1));
        token_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::DefaultTFIDFEngine;

    #[test]
    fn counts_keep_first_seen_order() {
        let freq = TokenFrequency::from_tokens(&["b", "a", "b", "c"]);
        assert_eq!(freq.token_set_ref_str(), vec!["b", "a", "c"]);
        assert_eq!(freq.token_count("b"), 2);
        assert_eq!(freq.token_count("z"), 0);
        assert_eq!(freq.token_total_count(), 4);
        assert_eq!(freq.token_num(), 3);
    }

    #[test]
    fn augmented_tf_uses_local_max() {
        let freq = TokenFrequency::from_tokens(&["good", "food", "good", "good", "bad"]);
        let tf = freq.tf_vector_ref_str::<DefaultTFIDFEngine>();
        assert_eq!(tf[0], ("good", 1.0));
        assert!((tf[1].1 - (0.5 + 0.5 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn sorted_frequency_is_stable_on_ties() {
        let freq = TokenFrequency::from_tokens(&["x", "y", "z", "y", "x", "w"]);
        let sorted: Vec<&str> = freq.sorted_frequency_vector().into_iter().map(|(t, _)| t).collect();
        assert_eq!(sorted, vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn serde_seq_round_trip_keeps_order() {
        let freq = TokenFrequency::from_tokens(&["z", "a", "z"]);
        let s = serde_json::to_string(&freq).unwrap();
        let de: TokenFrequency = serde_json::from_str(&s).unwrap();
        assert_eq!(de, freq);
        assert_eq!(de.token_set_ref_str(), vec!["z", "a"]);
    }

    #[test]
    fn empty_document_has_zero_max() {
        let freq = TokenFrequency::new();
        assert!(freq.is_empty());
        assert_eq!(freq.most_frequent_token_count(), 0);
        assert!(freq.tf_vector_ref_str::<DefaultTFIDFEngine>().is_empty());
    }
}
