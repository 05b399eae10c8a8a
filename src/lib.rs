/// This crate turns review text into TF-IDF feature vectors for star-rating prediction.
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod tokenizer;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// The training entry point of this crate.
/// `fit` tokenizes a corpus of reviews, derives corpus stop words, expands n-grams,
/// computes idf and fixes the vocabulary.
///
/// It returns:
/// - A `FittedVectorizerModel` that projects new text into the same feature space
/// - The `FeatureMatrix` of the training corpus
///
/// `TFIDFVectorizer<E>` is generic over the TF-IDF calculation engine `E`
/// (default `DefaultTFIDFEngine`).
pub use vectorizer::TFIDFVectorizer;

/// Fitted Vectorizer Model
/// Ordered vocabulary with idf, the stop words and the configuration used at training time.
/// Immutable once built, so it can be shared across threads for projection.
///
/// Every projection has exactly one entry per vocabulary n-gram, in vocabulary order.
///
/// # Serialization
/// Through `ModelData`, which validates every invariant on the way back in.
pub use vectorizer::{FeatureMatrix, FittedVectorizerModel};

/// Persisted Model Bundle
/// Plain serializable form of a fitted model plus an optional classifier.
/// JSON or CBOR, picked from the file extension.
pub use vectorizer::serde::ModelData;

/// Corpus for TF-IDF Vectorizer
/// Manages only:
/// - The number of documents
/// - The number of documents in which each n-gram appears
///
/// It is the base data for IDF (Inverse Document Frequency) calculation.
pub use vectorizer::corpus::Corpus;

/// Token Frequency structure
/// Counts token (or n-gram) occurrences within one document.
/// Used as base data for TF (Term Frequency) calculation and for stop word selection.
pub use vectorizer::token::TokenFrequency;

/// Corpus-derived stop words
pub use vectorizer::stop_words::StopWords;

/// TF IDF Calculation Engine Trait
/// By implementing this trait, you can plug different TF-IDF calculation strategies
/// into `TFIDFVectorizer<E>`.
/// `DefaultTFIDFEngine` uses augmented term frequency and natural-log idf.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Review text tokenizer and its shared Unicode punctuation table
pub use tokenizer::{PunctuationTable, Tokenizer, TokenizerConfig};

/// Rating classifiers trained on the feature vectors
pub use classifier::{evaluate, Evaluation, LinearSgdClassifier, RatingClassifier};

pub use config::{ClassifierConfig, Combination, PipelineConfig, VectorizerConfig};
pub use error::{Error, Result};
pub use utils::math::vector::ZeroSpVec;
