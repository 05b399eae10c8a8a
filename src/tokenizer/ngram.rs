/// Expands a token sequence into every contiguous run of 1..=`n` tokens.
///
/// All 1-grams come first (left to right), then all 2-grams, and so on.
/// A sequence shorter than `k` contributes no k-grams.
///
/// # Arguments
/// * `tokens` - ordered tokens of one document
/// * `n` - maximum n-gram length
///
/// # Returns
/// * `Vec<String>` - space-joined n-grams
pub fn make_ngrams<T>(tokens: &[T], n: usize) -> Vec<String>
where
    T: AsRef<str>,
{
    let m = tokens.len();
    let mut ngrams = Vec::with_capacity(ngram_count(m, n));
    for k in 1..=n.min(m) {
        for window in tokens.windows(k) {
            let mut gram = String::with_capacity(window.iter().map(|t| t.as_ref().len() + 1).sum());
            for (i, tok) in window.iter().enumerate() {
                if i > 0 {
                    gram.push(' ');
                }
                gram.push_str(tok.as_ref());
            }
            ngrams.push(gram);
        }
    }
    ngrams
}

/// Number of n-grams `make_ngrams` yields for `m` tokens.
#[inline]
pub fn ngram_count(m: usize, n: usize) -> usize {
    (1..=n.min(m)).map(|k| m - k + 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unigrams_then_bigrams() {
        let grams = make_ngrams(&["i", "love", "food"], 2);
        assert_eq!(grams, vec!["i", "love", "food", "i love", "love food"]);
    }

    #[test]
    fn short_documents_yield_fewer_windows() {
        assert_eq!(make_ngrams(&["solo"], 3), vec!["solo"]);
        assert!(make_ngrams::<&str>(&[], 3).is_empty());
        assert!(make_ngrams(&["a", "b"], 0).is_empty());
    }

    proptest! {
        #[test]
        fn prop_count_law(m in 0_usize..40, n in 1_usize..6) {
            let tokens: Vec<String> = (0..m).map(|i| format!("t{i}")).collect();
            let grams = make_ngrams(&tokens, n);
            let expected: usize = (1..=n.min(m)).map(|k| m - k + 1).sum();
            prop_assert_eq!(grams.len(), expected);
            prop_assert_eq!(grams.len(), ngram_count(m, n));
        }
    }
}
