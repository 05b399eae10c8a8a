pub mod corpus;
pub mod serde;
pub mod stop_words;
pub mod tfidf;
pub mod token;

use std::marker::PhantomData;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::{Combination, VectorizerConfig};
use crate::error::{Error, Result};
use crate::tokenizer::{make_ngrams, PunctuationTable, Tokenizer};
use crate::utils::math::vector::ZeroSpVec;
use crate::utils::OrderedMap;
use crate::vectorizer::{corpus::Corpus, stop_words::StopWords, tfidf::{DefaultTFIDFEngine, TFIDFEngine}, token::TokenFrequency};

/// One TF-IDF row per document, all of the same width.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<ZeroSpVec<f64>>,
    n_cols: usize,
}

impl FeatureMatrix {
    pub fn new(rows: Vec<ZeroSpVec<f64>>, n_cols: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == n_cols));
        Self { rows, n_cols }
    }

    #[inline]
    pub fn rows(&self) -> &[ZeroSpVec<f64>] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, idx: usize) -> Option<&ZeroSpVec<f64>> {
        self.rows.get(idx)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// vocabulary size
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Dense copy, absent n-grams as `0.0`.
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|row| row.to_dense()).collect()
    }
}

/// TF-IDF Vectorizer (training side)
///
/// `fit` tokenizes a corpus, derives stop words, expands n-grams, computes idf and
/// fixes the vocabulary, returning the immutable [`FittedVectorizerModel`] together
/// with the training feature matrix.
///
/// Per-document work runs on rayon; corpus statistics are aggregated sequentially
/// in document order, so the result does not depend on thread scheduling.
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    tokenizer: Tokenizer,
    config: VectorizerConfig,
    _marker: PhantomData<E>,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Create a new vectorizer, building its own punctuation table.
    pub fn new(config: VectorizerConfig) -> Result<Self> {
        Self::with_table(Arc::new(PunctuationTable::build()), config)
    }

    /// Create a new vectorizer sharing an existing punctuation table.
    pub fn with_table(table: Arc<PunctuationTable>, config: VectorizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::with_table(table, config.tokenizer_config()),
            config,
            _marker: PhantomData,
        })
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Fit vocabulary, idf and stop words on `texts` and vectorize them.
    ///
    /// Fails with [`Error::EmptyCorpus`] when `texts` is empty.
    /// A text with no surviving n-grams becomes an all-zero row.
    pub fn fit<S>(&self, texts: &[S]) -> Result<(FittedVectorizerModel<E>, FeatureMatrix)>
    where
        S: AsRef<str> + Sync,
    {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        let tokens: Vec<Vec<String>> = texts
            .par_iter()
            .map(|text| self.tokenizer.tokenize(text.as_ref()))
            .collect();
        log::info!("tokenized {} documents", tokens.len());

        let stop_words = if self.config.stop_word_count > 0 {
            StopWords::derive(&tokens, self.config.stop_word_count)?
        } else {
            StopWords::new()
        };
        log::debug!("stop words: {:?}", stop_words.iter().collect::<Vec<_>>());

        let n = self.config.ngram;
        let freqs: Vec<TokenFrequency> = tokens
            .into_par_iter()
            .map(|doc| analyze(&stop_words, n, doc))
            .collect();

        let corpus = Corpus::from_documents(freqs.iter());
        let mut vocabulary = corpus.idf_map::<E>()?;
        if let Some(max_features) = self.config.max_features {
            if vocabulary.len() > max_features {
                let keep: crate::utils::OrderedSet<&str> = corpus.top_terms(max_features).into_iter().collect();
                vocabulary.retain(|gram, _| keep.contains(gram.as_str()));
                log::debug!("feature selection kept {} of {} n-grams", vocabulary.len(), corpus.vocab_size());
            }
        }
        log::info!("vocabulary fixed at {} n-grams", vocabulary.len());

        let empty = freqs.iter().filter(|freq| freq.is_empty()).count();
        if empty > 0 {
            log::warn!("{empty} documents produced no n-grams and vectorize to zero rows");
        }

        let model = FittedVectorizerModel {
            vocabulary,
            stop_words,
            combination: Combination::new(&self.config, None),
            _marker: PhantomData,
        };
        let rows = freqs
            .par_iter()
            .map(|freq| model.tfidf_row(freq))
            .collect();
        let matrix = FeatureMatrix::new(rows, model.vocab_len());
        Ok((model, matrix))
    }
}

/// Removes stop words, expands n-grams and counts them.
/// Training and projection both go through here.
fn analyze(stop_words: &StopWords, n: usize, tokens: Vec<String>) -> TokenFrequency {
    let tokens = stop_words.remove_from(tokens);
    TokenFrequency::from_tokens(&make_ngrams(&tokens, n))
}

/// Vectorize documents that are already n-gram sequences.
///
/// The vocabulary is the union of all n-grams in first-seen order; the returned
/// map gives each one its idf. Fails on an empty corpus.
pub fn vectorize<E, T>(documents: &[Vec<T>]) -> Result<(FeatureMatrix, OrderedMap<String, f64>)>
where
    E: TFIDFEngine,
    T: AsRef<str> + Sync,
{
    let freqs: Vec<TokenFrequency> = documents
        .par_iter()
        .map(|doc| TokenFrequency::from_tokens(doc))
        .collect();
    let idf = Corpus::from_documents(freqs.iter()).idf_map::<E>()?;
    let rows = freqs
        .par_iter()
        .map(|freq| tfidf_row::<E>(freq, &idf))
        .collect();
    Ok((FeatureMatrix::new(rows, idf.len()), idf))
}

fn tfidf_row<E>(freq: &TokenFrequency, vocabulary: &OrderedMap<String, f64>) -> ZeroSpVec<f64>
where
    E: TFIDFEngine,
{
    let entries = freq
        .tf_vector_ref_str::<E>()
        .into_iter()
        .filter_map(|(gram, tf)| {
            vocabulary
                .get_full(gram)
                .map(|(idx, _, idf)| (idx, tf * idf))
        })
        .collect();
    ZeroSpVec::from_entries(vocabulary.len(), entries)
}

/// Fitted model: ordered vocabulary with idf, stop words and the configuration
/// they were built with.
///
/// Immutable once built; any number of projections may share it.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedVectorizerModel<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    /// n-gram -> idf, map order is column order
    vocabulary: OrderedMap<String, f64>,
    stop_words: StopWords,
    combination: Combination,
    _marker: PhantomData<E>,
}

impl<E> FittedVectorizerModel<E>
where
    E: TFIDFEngine,
{
    /// Assemble a model from persisted parts, checking every invariant.
    ///
    /// # Arguments
    /// * `vocabulary` - distinct n-grams, in column order
    /// * `idf` - exactly one finite, non-negative entry per vocabulary n-gram
    /// * `stop_words` - at most `combination.stop_words` entries
    pub fn from_parts(
        vocabulary: Vec<String>,
        idf: &OrderedMap<String, f64>,
        stop_words: StopWords,
        combination: Combination,
    ) -> Result<Self> {
        if combination.ngram == 0 {
            return Err(Error::MalformedModel("ngram must be at least 1".into()));
        }
        if stop_words.len() > combination.stop_words {
            return Err(Error::MalformedModel(format!(
                "{} stop words stored but the combination removes {}",
                stop_words.len(),
                combination.stop_words
            )));
        }
        if idf.len() != vocabulary.len() {
            return Err(Error::MalformedModel(format!(
                "vocabulary has {} entries but idf has {}",
                vocabulary.len(),
                idf.len()
            )));
        }
        let mut map = OrderedMap::with_capacity_and_hasher(vocabulary.len(), Default::default());
        for gram in vocabulary {
            let value = match idf.get(&gram) {
                Some(&value) => value,
                None => return Err(Error::MalformedModel(format!("no idf for {gram:?}"))),
            };
            if !value.is_finite() || value < 0.0 {
                return Err(Error::MalformedModel(format!("idf of {gram:?} is {value}")));
            }
            if map.insert(gram, value).is_some() {
                return Err(Error::MalformedModel("duplicate vocabulary entry".into()));
            }
        }
        Ok(Self {
            vocabulary: map,
            stop_words,
            combination,
            _marker: PhantomData,
        })
    }

    /// vocabulary in column order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.vocabulary.keys().map(|gram| gram.as_str())
    }

    #[inline]
    pub fn vocab_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// column of `gram`
    #[inline]
    pub fn index_of(&self, gram: &str) -> Option<usize> {
        self.vocabulary.get_index_of(gram)
    }

    #[inline]
    pub fn idf(&self, gram: &str) -> Option<f64> {
        self.vocabulary.get(gram).copied()
    }

    /// n-gram -> idf in column order
    #[inline]
    pub fn idf_map(&self) -> &OrderedMap<String, f64> {
        &self.vocabulary
    }

    #[inline]
    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    #[inline]
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Record the classifier hyperparameter trained on top of this model.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.combination.alpha = Some(alpha);
        self
    }

    /// A tokenizer configured the way this model was trained.
    pub fn tokenizer(&self, table: Arc<PunctuationTable>) -> Tokenizer {
        Tokenizer::with_table(table, self.combination.tokenizer_config())
    }

    /// Project already tokenized text into the fixed feature space.
    pub fn transform_tokens(&self, tokens: Vec<String>) -> ZeroSpVec<f64> {
        let freq = analyze(&self.stop_words, self.combination.ngram, tokens);
        self.tfidf_row(&freq)
    }

    /// Project one raw text into the fixed feature space.
    ///
    /// The result always has `vocab_len()` entries. Out-of-vocabulary n-grams are
    /// dropped; tf uses this text's own maximum count.
    pub fn project(&self, tokenizer: &Tokenizer, text: &str) -> ZeroSpVec<f64> {
        if tokenizer.config() != self.combination.tokenizer_config() {
            log::warn!(
                "tokenizer lemmatize={} differs from the trained lemmatize={}",
                tokenizer.config().lemmatize,
                self.combination.lemmatize
            );
        }
        self.transform_tokens(tokenizer.tokenize(text))
    }

    /// Project many texts, one row each.
    pub fn transform<S>(&self, tokenizer: &Tokenizer, texts: &[S]) -> FeatureMatrix
    where
        S: AsRef<str> + Sync,
    {
        let rows = texts
            .par_iter()
            .map(|text| self.project(tokenizer, text.as_ref()))
            .collect();
        FeatureMatrix::new(rows, self.vocab_len())
    }

    #[inline]
    fn tfidf_row(&self, freq: &TokenFrequency) -> ZeroSpVec<f64> {
        tfidf_row::<E>(freq, &self.vocabulary)
    }
}

/// Project `text` against a vocabulary/idf/stop-word set given as plain parts.
///
/// Validates the parts on every call; keep a [`FittedVectorizerModel`] around for
/// repeated projections.
pub fn project(
    tokenizer: &Tokenizer,
    text: &str,
    vocabulary: &[String],
    idf: &OrderedMap<String, f64>,
    stop_words: &StopWords,
    n: usize,
) -> Result<Vec<f64>> {
    let combination = Combination {
        ngram: n,
        lemmatize: tokenizer.config().lemmatize,
        stop_words: stop_words.len(),
        max_features: None,
        alpha: None,
    };
    let model = FittedVectorizerModel::<DefaultTFIDFEngine>::from_parts(
        vocabulary.to_vec(),
        idf,
        stop_words.clone(),
        combination,
    )?;
    Ok(model.project(tokenizer, text).to_dense())
}
