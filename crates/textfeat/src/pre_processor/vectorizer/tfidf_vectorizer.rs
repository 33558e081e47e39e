use sprs::CsMat;
use tracing::debug;

use super::{
    count_vectorizer::{CountVectorizer, Vocabulary},
    params::VectorizerParams,
};
use crate::Result;

#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug)]
pub struct TfidfVectorizer {
    count_vectorizer: CountVectorizer,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    pub fn fit<T: AsRef<str>>(
        texts: &[T],
        params: VectorizerParams,
        vocabulary: Option<Vocabulary>,
    ) -> Result<Self> {
        Self::fit_transform(texts, params, vocabulary).map(|(vectorizer, _)| vectorizer)
    }

    fn from_counts(count_vectorizer: CountVectorizer, tf_matrix: &CsMat<f64>) -> Self {
        debug!("Calculating IDF values");

        // Smooth IDF: ln((n_docs + 1) / (df + 1)) + 1
        let n_docs = tf_matrix.rows() as f64;
        let mut df = vec![0usize; count_vectorizer.num_features()];
        for row_vec in tf_matrix.outer_iterator() {
            for (col_idx, _val) in row_vec.iter() {
                df[col_idx] += 1;
            }
        }
        let idf = df
            .iter()
            .map(|&doc_freq| ((n_docs + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0)
            .collect();
        debug!("IDF calculation complete");

        Self {
            count_vectorizer,
            idf,
        }
    }

    /// Applies (optionally sublinear) tf scaling, IDF weights and per-row L2 normalisation.
    fn weight(&self, mut tf_matrix: CsMat<f64>) -> CsMat<f64> {
        let sublinear_tf = self.count_vectorizer.params().sublinear_tf();
        for mut row_vec in tf_matrix.outer_iterator_mut() {
            for (col_idx, val) in row_vec.iter_mut() {
                if sublinear_tf {
                    *val = 1.0 + val.ln();
                }
                *val *= self.idf[col_idx];
            }
            let norm = row_vec.iter().map(|(_, &v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, val) in row_vec.iter_mut() {
                    *val /= norm;
                }
            }
        }
        tf_matrix
    }

    pub fn transform<T: AsRef<str>>(&self, texts: &[T]) -> CsMat<f64> {
        debug!(
            num_texts = texts.len(),
            "Transforming texts using TfidfVectorizer"
        );
        self.weight(self.count_vectorizer.transform(texts))
    }

    pub fn fit_transform<T: AsRef<str>>(
        texts: &[T],
        params: VectorizerParams,
        vocabulary: Option<Vocabulary>,
    ) -> Result<(Self, CsMat<f64>)> {
        debug!(num_texts = texts.len(), "Fitting TfidfVectorizer");
        let (count_vectorizer, tf_matrix) =
            CountVectorizer::fit_transform(texts, params, vocabulary)?;
        let vectorizer = Self::from_counts(count_vectorizer, &tf_matrix);
        let transformed = vectorizer.weight(tf_matrix);
        Ok((vectorizer, transformed))
    }

    pub fn num_features(&self) -> usize {
        self.count_vectorizer.num_features()
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.count_vectorizer.vocabulary()
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.count_vectorizer.feature_names()
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn params(&self) -> &VectorizerParams {
        self.count_vectorizer.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unigram_params() -> VectorizerParams {
        VectorizerParams::word().with_ngram_range(1..=1)
    }

    #[test]
    fn test_idf_values() {
        let vectorizer =
            TfidfVectorizer::fit(&["hello world", "hello rust"], unigram_params(), None).unwrap();
        assert_eq!(vectorizer.feature_names(), vec!["hello", "rust", "world"]);
        let idf = vectorizer.idf();
        // "hello" is in every document
        assert!((idf[0] - 1.0).abs() < 1e-12);
        let rare = (3.0_f64 / 2.0).ln() + 1.0;
        assert!((idf[1] - rare).abs() < 1e-12);
        assert!((idf[2] - rare).abs() < 1e-12);
    }

    #[test]
    fn test_rows_are_l2_normalised() {
        let (_, matrix) = TfidfVectorizer::fit_transform(
            &["cats and dogs", "cats cats", "birds"],
            VectorizerParams::word(),
            None,
        )
        .unwrap();
        for row in matrix.outer_iterator() {
            let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sublinear_tf_dampens_counts() {
        let docs = ["a a a a b", "b c"];
        let (_, linear) = TfidfVectorizer::fit_transform(&docs, unigram_params(), None).unwrap();
        let (_, sublinear) = TfidfVectorizer::fit_transform(
            &docs,
            unigram_params().with_sublinear_tf(true),
            None,
        )
        .unwrap();
        let linear_a = *linear.get(0, 0).unwrap();
        let sublinear_a = *sublinear.get(0, 0).unwrap();
        assert!(sublinear_a < linear_a);
    }

    #[test]
    fn test_transform_matches_fit_transform() {
        let docs = ["the quick brown fox", "the lazy dog", "quick quick dog"];
        let params = VectorizerParams::word().with_sublinear_tf(true);
        let (vectorizer, fitted) = TfidfVectorizer::fit_transform(&docs, params, None).unwrap();
        let transformed = vectorizer.transform(&docs);
        assert_eq!(
            fitted.indptr().raw_storage(),
            transformed.indptr().raw_storage()
        );
        assert_eq!(fitted.indices(), transformed.indices());
        for (a, b) in fitted.data().iter().zip(transformed.data()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
