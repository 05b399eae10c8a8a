use rayon::prelude::*;
use regex::Regex;

/// Every code point whose Unicode general category is Punctuation (`P*`).
///
/// Built once by scanning the whole code-point range and read-only afterwards,
/// so a single table can be shared between tokenizers and threads.
#[derive(Debug, Clone)]
pub struct PunctuationTable {
    /// sorted ascending
    chars: Vec<char>,
}

impl PunctuationTable {
    /// Scans `U+0000..=U+10FFFF` in parallel.
    pub fn build() -> Self {
        let re = Regex::new(r"\p{P}").expect("static punctuation class");
        let mut chars: Vec<char> = (0..=char::MAX as u32)
            .into_par_iter()
            .filter_map(char::from_u32)
            .filter(|c| {
                let mut buf = [0u8; 4];
                re.is_match(c.encode_utf8(&mut buf))
            })
            .collect();
        // collect() on an indexed range keeps order, sort anyway for the binary search
        chars.sort_unstable();
        log::debug!("punctuation table built with {} code points", chars.len());
        Self { chars }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        // ASCII fast path
        if c.is_ascii() {
            return c.is_ascii_punctuation() && self.chars.binary_search(&c).is_ok();
        }
        self.chars.binary_search(&c).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}
