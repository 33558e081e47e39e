use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use super::{ngrams, params::VectorizerParams, tokenizer};
use crate::{Error, Result};

/// Token (or n-gram) to column index.
pub type Vocabulary = HashMap<String, usize>;

#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug)]
pub struct CountVectorizer {
    params: VectorizerParams,
    /// Vocabulary mapping n-gram to feature index
    vocab: Vocabulary,
    /// Whether `vocab` was supplied by the caller rather than learned
    fixed_vocabulary: bool,
}

/// Checks that a caller-supplied vocabulary maps onto `0..len` without gaps or duplicates.
pub fn validate_vocabulary(vocabulary: &Vocabulary) -> Result<()> {
    if vocabulary.is_empty() {
        return Err(Error::EmptyVocabulary);
    }
    let mut seen = vec![false; vocabulary.len()];
    for (term, &idx) in vocabulary {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            Some(_) => {
                return Err(Error::Configuration(format!(
                    "vocabulary index {idx} is assigned more than once (at {term:?})"
                )));
            }
            None => {
                return Err(Error::Configuration(format!(
                    "vocabulary index {idx} for {term:?} is outside 0..{}",
                    vocabulary.len()
                )));
            }
        }
    }
    Ok(())
}

impl CountVectorizer {
    pub fn fit<T: AsRef<str>>(
        texts: &[T],
        params: VectorizerParams,
        vocabulary: Option<Vocabulary>,
    ) -> Result<Self> {
        Self::fit_transform(texts, params, vocabulary).map(|(vectorizer, _)| vectorizer)
    }

    /// Fit from pre-computed per-document n-gram counts.
    fn fit_from_ngrams(
        ngram_maps: &[HashMap<String, usize>],
        params: VectorizerParams,
        vocabulary: Option<Vocabulary>,
    ) -> Result<Self> {
        if let Some(vocab) = vocabulary {
            validate_vocabulary(&vocab)?;
            debug!(vocab_size = vocab.len(), "Using fixed vocabulary");
            return Ok(Self {
                params,
                vocab,
                fixed_vocabulary: true,
            });
        }

        debug!("Building vocabulary from tokenized texts");
        let sorted_tokens = ngrams::distinct_ngrams(ngram_maps);
        if sorted_tokens.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        let vocab = sorted_tokens
            .into_iter()
            .enumerate()
            .map(|(idx, token)| (token, idx))
            .collect::<Vocabulary>();

        debug!(vocab_size = vocab.len(), "CountVectorizer fitting complete");

        Ok(Self {
            params,
            vocab,
            fixed_vocabulary: false,
        })
    }

    fn count_documents<T: AsRef<str>>(
        texts: &[T],
        params: &VectorizerParams,
    ) -> Vec<HashMap<String, usize>> {
        tokenizer::tokenize(texts, params)
            .iter()
            .map(|tokens| ngrams::count_ngrams(tokens, params))
            .collect()
    }

    pub fn transform<T: AsRef<str>>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using CountVectorizer"
        );
        let ngram_maps = Self::count_documents(texts, &self.params);
        self.transform_from_ngrams(&ngram_maps)
    }

    /// Build the CSR count matrix, one row per document with sorted column indices.
    fn transform_from_ngrams(&self, ngram_maps: &[HashMap<String, usize>]) -> CsMat<f64> {
        let mut indptr = Vec::with_capacity(ngram_maps.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);

        for ngrams in ngram_maps {
            let mut row_entries = ngrams
                .iter()
                .filter_map(|(ngram, &count)| {
                    self.vocab
                        .get(ngram)
                        .map(|&col_idx| (col_idx, count as f64))
                })
                .collect::<Vec<_>>();

            row_entries.sort_by_key(|(col_idx, _)| *col_idx);
            for (col_idx, count) in row_entries {
                indices.push(col_idx);
                data.push(count);
            }
            indptr.push(indices.len());
        }

        debug!(
            non_zero_entries = data.len(),
            "Text transformation complete"
        );
        CsMat::new(
            (ngram_maps.len(), self.num_features()),
            indptr,
            indices,
            data,
        )
    }

    /// Tokenizes and counts n-grams once, reusing them for both fitting and transforming.
    pub fn fit_transform<T: AsRef<str>>(
        texts: &[T],
        params: VectorizerParams,
        vocabulary: Option<Vocabulary>,
    ) -> Result<(Self, CsMat<f64>)> {
        debug!(num_texts = texts.len(), "Fitting CountVectorizer");
        let ngram_maps = Self::count_documents(texts, &params);
        let vectorizer = Self::fit_from_ngrams(&ngram_maps, params, vocabulary)?;
        let transformed = vectorizer.transform_from_ngrams(&ngram_maps);
        Ok((vectorizer, transformed))
    }

    pub fn num_features(&self) -> usize {
        self.vocab.len()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Vocabulary terms ordered by their column index.
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names = vec![""; self.vocab.len()];
        for (term, &idx) in &self.vocab {
            names[idx] = term.as_str();
        }
        names
    }

    pub fn has_fixed_vocabulary(&self) -> bool {
        self.fixed_vocabulary
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}
