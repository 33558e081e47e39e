use std::ops::RangeInclusive;

/// How a document is split into the units that n-grams are built from.
#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Analyzer {
    /// Unicode word runs; n-grams are joined with a single space.
    Word,
    /// Individual non-whitespace characters; n-grams are concatenated.
    Char,
}

#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq)]
pub struct VectorizerParams {
    analyzer: Analyzer,
    ngram_range: Vec<usize>,
    /// Apply sublinear tf scaling: replace term frequency `tf` with `1 + log(tf)`.
    /// This reduces the impact of terms that occur many times in a document.
    sublinear_tf: bool,
    /// Sorted, deduplicated tokens dropped before n-grams are formed.
    stop_words: Vec<String>,
}

impl VectorizerParams {
    pub fn new(analyzer: Analyzer, ngram_range: impl Into<RangeInclusive<usize>>) -> Self {
        let n_sizes = ngram_range.into().collect::<Vec<_>>();
        assert!(
            !n_sizes.is_empty() && n_sizes[0] > 0,
            "ngram_range must be a non-empty range of positive sizes"
        );
        Self {
            analyzer,
            ngram_range: n_sizes,
            sublinear_tf: false,
            stop_words: Vec::new(),
        }
    }

    /// Word unigrams and bigrams.
    #[must_use]
    pub fn word() -> Self {
        Self::new(Analyzer::Word, 1..=2)
    }

    /// Character unigrams and bigrams.
    #[must_use]
    pub fn char() -> Self {
        Self::new(Analyzer::Char, 1..=2)
    }

    #[must_use]
    pub fn with_ngram_range(mut self, ngram_range: impl Into<RangeInclusive<usize>>) -> Self {
        self.ngram_range = Self::new(self.analyzer, ngram_range).ngram_range;
        self
    }

    #[must_use]
    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    #[must_use]
    pub fn with_stop_words<S: AsRef<str>>(mut self, stop_words: &[S]) -> Self {
        let mut words = stop_words
            .iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect::<Vec<_>>();
        words.sort();
        words.dedup();
        self.stop_words = words;
        self
    }

    #[must_use]
    pub fn analyzer(&self) -> Analyzer {
        self.analyzer
    }

    #[must_use]
    pub fn ngram_counts(&self) -> &[usize] {
        &self.ngram_range
    }

    #[must_use]
    pub fn ngram_range(&self) -> (usize, usize) {
        let first = self.ngram_range.first().copied().unwrap_or(1);
        let last = self.ngram_range.last().copied().unwrap_or(first);
        (first, last)
    }

    #[must_use]
    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    pub(crate) fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words
            .binary_search_by(|w| w.as_str().cmp(token))
            .is_ok()
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self::word()
    }
}

impl From<(Analyzer, (usize, usize), bool)> for VectorizerParams {
    fn from(value: (Analyzer, (usize, usize), bool)) -> Self {
        Self::new(value.0, value.1.0..=value.1.1).with_sublinear_tf(value.2)
    }
}
