use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::OrderedMap;
use crate::vectorizer::tfidf::TFIDFEngine;
use crate::vectorizer::token::TokenFrequency;

/// keep document count and per-term document frequency
///
/// Terms are kept in first-seen order, which is the vocabulary order.
/// Aggregation is plain counting, so adding documents in a different order
/// changes only that ordering, never a count.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Corpus {
    /// number of added documents, empty ones included
    pub doc_num: u64,
    /// number of documents containing each term
    #[serde(with = "indexmap::map::serde_seq")]
    pub term_counts: OrderedMap<Box<str>, u64>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a corpus from per-document term frequencies.
    pub fn from_documents<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a TokenFrequency>,
    {
        let mut corpus = Self::new();
        for doc in docs {
            corpus.add_set(&doc.token_set_ref_str());
        }
        corpus
    }

    /// Add one document's distinct terms to the corpus
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        self.doc_num += 1;
        for term in terms {
            if let Some(count) = self.term_counts.get_mut(term.as_ref()) {
                *count += 1;
            } else {
                self.term_counts.insert(term.as_ref().into(), 1);
            }
        }
    }

    /// Get the number of documents in the corpus
    #[inline]
    pub fn get_doc_num(&self) -> u64 {
        self.doc_num
    }

    /// Get the number of documents containing `term`
    #[inline]
    pub fn get_term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Get the current vocabulary size (number of unique terms)
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// idf of every term, in corpus order.
    ///
    /// Fails on an empty corpus since `ln(0 / d)` is meaningless.
    pub fn idf_map<E>(&self) -> Result<OrderedMap<String, f64>>
    where
        E: TFIDFEngine,
    {
        if self.doc_num == 0 {
            return Err(Error::EmptyCorpus);
        }
        Ok(self.term_counts
            .iter()
            .map(|(term, &doc_freq)| (term.to_string(), E::idf_calc(self.doc_num, doc_freq)))
            .collect())
    }

    /// Terms ranked by document frequency (descending, ties in corpus order),
    /// truncated to `max_features`.
    pub fn top_terms(&self, max_features: usize) -> Vec<&str> {
        let mut ranked: Vec<(&str, u64)> = self.term_counts
            .iter()
            .map(|(term, &count)| (&**term, count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(max_features);
        ranked.into_iter().map(|(term, _)| term).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::DefaultTFIDFEngine;

    fn sample() -> Corpus {
        let docs = [
            TokenFrequency::from_tokens(&["i", "love", "food"]),
            TokenFrequency::from_tokens(&["i", "hate", "food", "food"]),
            TokenFrequency::from_tokens(&["food", "is", "great"]),
        ];
        Corpus::from_documents(docs.iter())
    }

    #[test]
    fn document_frequency_counts_each_document_once() {
        let corpus = sample();
        assert_eq!(corpus.get_doc_num(), 3);
        assert_eq!(corpus.get_term_count("food"), 3);
        assert_eq!(corpus.get_term_count("i"), 2);
        assert_eq!(corpus.get_term_count("nope"), 0);
        assert_eq!(corpus.vocab_size(), 6);
    }

    #[test]
    fn idf_follows_scenario() {
        let idf = sample().idf_map::<DefaultTFIDFEngine>().unwrap();
        assert_eq!(idf["food"], 0.0);
        assert!((idf["i"] - (3.0_f64 / 2.0).ln()).abs() < 1e-12);
        assert!((idf["i"] - 0.405).abs() < 1e-3);
        assert!((idf["great"] - 3.0_f64.ln()).abs() < 1e-12);
        let order: Vec<&str> = idf.keys().map(|k| k.as_str()).collect();
        assert_eq!(order, vec!["i", "love", "food", "hate", "is", "great"]);
    }

    #[test]
    fn empty_corpus_is_an_error() {
        assert!(matches!(Corpus::new().idf_map::<DefaultTFIDFEngine>(), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn empty_documents_still_count() {
        let mut corpus = Corpus::new();
        corpus.add_set(&["a"]);
        corpus.add_set::<&str>(&[]);
        let idf = corpus.idf_map::<DefaultTFIDFEngine>().unwrap();
        assert!((idf["a"] - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn top_terms_prefers_frequent_then_first_seen() {
        assert_eq!(sample().top_terms(3), vec!["food", "i", "love"]);
        assert_eq!(sample().top_terms(100).len(), 6);
    }
}
