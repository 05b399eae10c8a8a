/// TF-IDF calculation engine
///
/// The vectorizer is generic over the engine so the weighting can be swapped
/// without touching tokenization or vocabulary handling.
/// Shared across rayon workers.
pub trait TFIDFEngine: Send + Sync {
    /// Term frequency of a token seen `count` times in a document whose most
    /// frequent token was seen `max_count` times.
    /// `count` is never zero when called from the vectorizer.
    fn tf_calc(max_count: u32, count: u32) -> f64;

    /// Inverse document frequency of a token contained in `doc_freq` of `doc_num` documents.
    /// `1 <= doc_freq <= doc_num` when called from the vectorizer.
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64;
}

/// デフォルトのTF-IDFエンジン
///
/// * tf: augmented frequency `0.5 + 0.5 * count / max_count`, always in `[0.5, 1.0]`
/// * idf: `ln(doc_num / doc_freq)`, zero exactly when a token is in every document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf_calc(max_count: u32, count: u32) -> f64 {
        if max_count == 0 {
            return 0.0;
        }
        0.5 + 0.5 * (count as f64 / max_count as f64)
    }

    #[inline]
    fn idf_calc(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / doc_freq as f64).ln()
    }
}
