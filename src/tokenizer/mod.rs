pub mod lemma;
pub mod ngram;
pub mod punctuation;

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use lemma::{Lemmatizer, NoLemmatizer, StemmingLemmatizer};
pub use ngram::make_ngrams;
pub use punctuation::PunctuationTable;

/// Words starting with one of these are dropped (mentions, hashtags, links, escaped ampersands).
pub const STOP_PREFIXES: [&str; 4] = ["@", "#", "http", "&amp"];

/// HTML entity artifacts left over by the crawler, longest match first.
const ENTITY_REPLACEMENTS: [(&str, &str); 5] = [
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&quot;", "\""),
    ("&quot", "\""),
    ("quot;", "\""),
];

/// kept inside words for contractions
const APOSTROPHE: char = '\'';

/// punctuation that starts a reserved prefix, kept when looking for one
const PREFIX_MARKS: [char; 3] = ['@', '#', '&'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub lemmatize: bool,
}

/// Review text tokenizer
///
/// Splits on whitespace, decodes entity artifacts, strips edge punctuation,
/// splits on inner punctuation (apostrophes excepted), lowercases, optionally
/// lemmatizes, and drops sub-words containing digits or reserved prefixes.
///
/// The punctuation table is shared through an `Arc`; building one scans the whole
/// Unicode range, so construct it once and hand it to every tokenizer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    punctuation: Arc<PunctuationTable>,
    lemmatizer: Option<Arc<dyn Lemmatizer>>,
    digit: Regex,
}

impl Tokenizer {
    /// Builds a fresh punctuation table.
    pub fn new(config: TokenizerConfig) -> Self {
        Self::with_table(Arc::new(PunctuationTable::build()), config)
    }

    pub fn with_table(punctuation: Arc<PunctuationTable>, config: TokenizerConfig) -> Self {
        let lemmatizer: Option<Arc<dyn Lemmatizer>> = if config.lemmatize {
            Some(Arc::new(StemmingLemmatizer::english()))
        } else {
            None
        };
        Self::with_lemmatizer(punctuation, lemmatizer)
    }

    /// Plug a custom lemmatizer (`None` disables lemmatization).
    pub fn with_lemmatizer(punctuation: Arc<PunctuationTable>, lemmatizer: Option<Arc<dyn Lemmatizer>>) -> Self {
        Self {
            punctuation,
            lemmatizer,
            digit: Regex::new(r"\d").expect("static digit class"),
        }
    }

    pub fn config(&self) -> TokenizerConfig {
        TokenizerConfig {
            lemmatize: self.lemmatizer.is_some(),
        }
    }

    pub fn punctuation(&self) -> &Arc<PunctuationTable> {
        &self.punctuation
    }

    /// Converts one review into its ordered token sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for raw in text.split_whitespace() {
            let word = decode_entities(raw);
            if self.is_reserved(&word) {
                continue;
            }
            let word = self.strip_edges(&word);
            if word.is_empty() {
                continue;
            }
            let spaced: String = word
                .chars()
                .map(|c| if c != APOSTROPHE && self.punctuation.contains(c) { ' ' } else { c })
                .collect();
            for sub in spaced.split_whitespace() {
                // "rock'/roll" leaves "rock'" behind
                let sub = self.strip_edges(sub);
                if sub.is_empty() {
                    continue;
                }
                let token = self.lemmatize(sub.to_lowercase());
                if self.keep(&token) {
                    tokens.push(token);
                }
            }
        }
        tokens
    }

    /// Whole-word prefix check, ignoring case and wrapping punctuation:
    /// `(Http://x.com)` and `"@chef"` are both reserved.
    fn is_reserved(&self, word: &str) -> bool {
        let bare = word.trim_matches(|c: char| self.punctuation.contains(c) && !PREFIX_MARKS.contains(&c));
        has_stop_prefix(&bare.to_lowercase())
    }

    /// Lemma of a lowercase sub-word, or the word itself when the lemma would not
    /// survive being tokenized again unchanged.
    fn lemmatize(&self, lower: String) -> String {
        let Some(lemmatizer) = &self.lemmatizer else {
            return lower;
        };
        let normalize = |word: &str| self.strip_edges(&lemmatizer.lemmatize(word)).to_string();
        let lemma = normalize(&lower);
        if !lemma.is_empty() && normalize(&lemma) == lemma {
            lemma
        } else {
            lower
        }
    }

    #[inline]
    fn strip_edges<'a>(&self, word: &'a str) -> &'a str {
        word.trim_matches(|c: char| self.punctuation.contains(c))
    }

    #[inline]
    fn keep(&self, token: &str) -> bool {
        !token.is_empty() && !self.digit.is_match(token) && !has_stop_prefix(token)
    }
}

/// Joins tokens back into a single line.
pub fn render<T: AsRef<str>>(tokens: &[T]) -> String {
    tokens.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ")
}

fn decode_entities(word: &str) -> String {
    let mut decoded = word.to_string();
    for (entity, literal) in ENTITY_REPLACEMENTS {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, literal);
        }
    }
    decoded
}

#[inline]
fn has_stop_prefix(word: &str) -> bool {
    STOP_PREFIXES.iter().any(|prefix| word.starts_with(prefix))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::OnceLock;

    use super::*;
    use proptest::prelude::*;

    pub(crate) fn shared_table() -> Arc<PunctuationTable> {
        static TABLE: OnceLock<Arc<PunctuationTable>> = OnceLock::new();
        TABLE.get_or_init(|| Arc::new(PunctuationTable::build())).clone()
    }

    pub(crate) fn tokenizer(lemmatize: bool) -> Tokenizer {
        Tokenizer::with_table(shared_table(), TokenizerConfig { lemmatize })
    }

    #[test]
    fn lowercases_and_strips_trailing_punctuation() {
        assert_eq!(tokenizer(false).tokenize("I LOVE the Food!!"), vec!["i", "love", "the", "food"]);
    }

    #[test]
    fn splits_on_inner_slash() {
        assert_eq!(tokenizer(false).tokenize("great/cheap eats"), vec!["great", "cheap", "eats"]);
    }

    #[test]
    fn keeps_inner_apostrophe_only() {
        let tok = tokenizer(false);
        assert_eq!(tok.tokenize("Don't 'quote' dogs'"), vec!["don't", "quote", "dogs"]);
        assert_eq!(tok.tokenize("rock'/roll"), vec!["rock", "roll"]);
    }

    #[test]
    fn decodes_entity_artifacts() {
        let tok = tokenizer(false);
        assert_eq!(tok.tokenize("it&apos;s &quot;fine&quot;"), vec!["it's", "fine"]);
        assert_eq!(tok.tokenize("we&#39;re"), vec!["we're"]);
    }

    #[test]
    fn drops_links_mentions_digits() {
        let tok = tokenizer(false);
        assert!(tok.tokenize("http://example.com 12345 3rd").is_empty());
        assert_eq!(tok.tokenize("@chef #yum &amp; tasty"), vec!["tasty"]);
        assert_eq!(tok.tokenize("open 24/7 daily"), vec!["open", "daily"]);
    }

    #[test]
    fn reserved_prefixes_ignore_case_and_wrapping() {
        let tok = tokenizer(false);
        assert!(tok.tokenize("Https://Yelp.com").is_empty());
        assert!(tok.tokenize("HTTP://EXAMPLE.COM").is_empty());
        assert!(tok.tokenize("(http://example.com)").is_empty());
        assert!(tok.tokenize("\"@chef\"").is_empty());
        assert!(tok.tokenize("(#yum)").is_empty());
        assert!(tok.tokenize("&AMP;").is_empty());
        assert_eq!(tok.tokenize("see (http://example.com) Great!"), vec!["see", "great"]);
    }

    #[test]
    fn lemmas_are_stable_under_retokenizing() {
        let tok = tokenizer(true);
        let first = tok.tokenize("generously happiness universal");
        assert_eq!(tok.tokenize(&render(&first)), first);
        assert!(first.contains(&"universal".to_string()));
    }

    #[test]
    fn punctuation_only_words_vanish() {
        let tok = tokenizer(false);
        assert!(tok.tokenize("!!! ... \u{2014} ?!").is_empty());
        assert!(tok.tokenize("").is_empty());
    }

    #[test]
    fn unicode_punctuation_is_stripped() {
        let tok = tokenizer(false);
        assert_eq!(tok.tokenize("\u{201C}Amazing\u{201D} \u{00BF}qué?"), vec!["amazing", "qué"]);
        assert_eq!(tok.tokenize("fish\u{2014}chips"), vec!["fish", "chips"]);
    }

    #[test]
    fn lemmatize_is_configurable() {
        assert_eq!(tokenizer(true).tokenize("Cats running"), vec!["cat", "run"]);
        assert_eq!(tokenizer(false).tokenize("Cats running"), vec!["cats", "running"]);
        assert!(tokenizer(true).config().lemmatize);
    }

    proptest! {
        #[test]
        fn prop_tokenize_is_stable(text in "[a-zA-Z0-9 !?.,'/@#&;:\u{2019}\u{00e9}\u{201c}-]{0,80}") {
            let tok = tokenizer(false);
            let first = tok.tokenize(&text);
            let second = tok.tokenize(&render(&first));
            prop_assert_eq!(&first, &second);
            for token in &first {
                prop_assert!(!token.is_empty());
                prop_assert!(!token.chars().any(|c| c.is_ascii_digit()));
                prop_assert!(!token.starts_with('\'') && !token.ends_with('\''));
            }
        }

        #[test]
        fn prop_lemmatized_tokenize_is_stable(text in "[a-zA-Z' .,/-]{0,80}") {
            let tok = tokenizer(true);
            let first = tok.tokenize(&text);
            prop_assert_eq!(&first, &tok.tokenize(&render(&first)));
        }

        #[test]
        fn prop_tokenize_is_deterministic(text in ".{0,60}") {
            let tok = tokenizer(false);
            prop_assert_eq!(tok.tokenize(&text), tok.tokenize(&text));
        }
    }
}
