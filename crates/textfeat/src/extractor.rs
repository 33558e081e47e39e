use std::path::Path;

use ndarray::Array2;
use sprs::CsMat;
use tracing::{Dispatch, debug, info};

use crate::{
    Error, Result,
    config::{ExtractorConfig, Strategy},
    persistence,
    pre_processor::{
        CountVectorizer, SequenceTokenizer, TfidfVectorizer, VectorizerParams, Vocabulary,
        pad_sequences, segment_chars,
    },
    resources::ResourceLists,
};

/// Number of vocabulary entries written to the debug log after fitting or loading.
const VOCAB_SAMPLE_SIZE: usize = 10;

/// Output of [`FeatureExtractor::extract`], one row per corpus entry.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureMatrix {
    /// CSR matrix with one column per vocabulary term
    Sparse(CsMat<f64>),
    /// Word ids, one column per padded sequence position
    Sequences(Array2<u32>),
}

impl FeatureMatrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Self::Sparse(m) => m.shape(),
            Self::Sequences(m) => m.dim(),
        }
    }

    pub fn as_sparse(&self) -> Option<&CsMat<f64>> {
        match self {
            Self::Sparse(m) => Some(m),
            Self::Sequences(_) => None,
        }
    }

    pub fn as_sequences(&self) -> Option<&Array2<u32>> {
        match self {
            Self::Sequences(m) => Some(m),
            Self::Sparse(_) => None,
        }
    }
}

/// The transformer produced or loaded by an extraction.
#[derive(Clone, Debug)]
pub enum FittedTransformer {
    Tfidf(TfidfVectorizer),
    Count(CountVectorizer),
    Sequence(SequenceTokenizer),
}

impl FittedTransformer {
    pub fn num_features(&self) -> usize {
        match self {
            Self::Tfidf(v) => v.num_features(),
            Self::Count(v) => v.num_features(),
            Self::Sequence(t) => t.num_words(),
        }
    }
}

/// Fits or loads a vectorizer for one corpus according to an [`ExtractorConfig`].
///
/// In training mode a fresh vectorizer is fitted and, for every strategy except
/// [`Strategy::Sequence`], saved to the configured path. In inference mode the vectorizer
/// is loaded from that path and applied unchanged.
pub struct FeatureExtractor {
    corpus: Vec<String>,
    config: ExtractorConfig,
    resources: ResourceLists,
    dispatch: Dispatch,
    fitted: Option<FittedTransformer>,
}

impl FeatureExtractor {
    /// Validates `config` and loads the configured resource lists.
    pub fn new<I, S>(corpus: I, config: ExtractorConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        config.validate()?;
        let resources = ResourceLists::load(&config.resources)?;
        Ok(Self {
            corpus: corpus.into_iter().map(Into::into).collect(),
            config,
            resources,
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
            fitted: None,
        })
    }

    /// Routes this extractor's log events to `dispatch` instead of the ambient subscriber.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn resources(&self) -> &ResourceLists {
        &self.resources
    }

    pub fn corpus(&self) -> &[String] {
        &self.corpus
    }

    /// The transformer from the last successful [`extract`](Self::extract) call.
    pub fn fitted(&self) -> Option<&FittedTransformer> {
        self.fitted.as_ref()
    }

    pub fn extract(&mut self) -> Result<FeatureMatrix> {
        let dispatch = self.dispatch.clone();
        tracing::dispatcher::with_default(&dispatch, || -> Result<FeatureMatrix> {
            let _span = tracing::info_span!(
                "extract",
                strategy = %self.config.strategy,
                inference = self.config.is_inference
            )
            .entered();
            let features = match self.config.strategy {
                Strategy::TfidfChar => self.tfidf_char()?,
                Strategy::TfidfWord => self.tfidf_word()?,
                Strategy::TfWord => self.tf_word()?,
                Strategy::Sequence => self.sequence(),
            };
            let (rows, cols) = features.shape();
            info!(rows, cols, "Extracted features");
            Ok(features)
        })
    }

    fn persistence_path(&self) -> Result<&Path> {
        self.config.persistence_path.as_deref().ok_or_else(|| {
            Error::Configuration(format!(
                "strategy {} requires a persistence path",
                self.config.strategy
            ))
        })
    }

    fn word_params(&self) -> VectorizerParams {
        let params = VectorizerParams::word();
        if self.config.filter_stop_words {
            params.with_stop_words(&self.resources.stop_words)
        } else {
            params
        }
    }

    fn fixed_vocabulary(&self) -> Option<Vocabulary> {
        self.config.vocabulary.clone()
    }

    fn tfidf_char(&mut self) -> Result<FeatureMatrix> {
        let path = self.persistence_path()?.to_path_buf();
        let segmented = segment_chars(&self.corpus);
        let (vectorizer, features) = if self.config.is_inference {
            let vectorizer: TfidfVectorizer = persistence::load(&path)?;
            let features = vectorizer.transform(&segmented);
            (vectorizer, features)
        } else {
            let params = VectorizerParams::char().with_sublinear_tf(true);
            TfidfVectorizer::fit_transform(&segmented, params, None)?
        };
        log_vocabulary(vectorizer.vocabulary());
        if !self.config.is_inference {
            persistence::save(&vectorizer, &path, true)?;
        }
        self.fitted = Some(FittedTransformer::Tfidf(vectorizer));
        Ok(FeatureMatrix::Sparse(features))
    }

    fn tfidf_word(&mut self) -> Result<FeatureMatrix> {
        let path = self.persistence_path()?.to_path_buf();
        let (vectorizer, features) = if self.config.is_inference {
            let vectorizer: TfidfVectorizer = persistence::load(&path)?;
            let features = vectorizer.transform(&self.corpus);
            (vectorizer, features)
        } else {
            let params = self.word_params().with_sublinear_tf(true);
            TfidfVectorizer::fit_transform(&self.corpus, params, self.fixed_vocabulary())?
        };
        log_vocabulary(vectorizer.vocabulary());
        if !self.config.is_inference || self.config.resave_on_inference {
            persistence::save(&vectorizer, &path, true)?;
        }
        self.fitted = Some(FittedTransformer::Tfidf(vectorizer));
        Ok(FeatureMatrix::Sparse(features))
    }

    fn tf_word(&mut self) -> Result<FeatureMatrix> {
        let path = self.persistence_path()?.to_path_buf();
        let (vectorizer, features) = if self.config.is_inference {
            let vectorizer: CountVectorizer = persistence::load(&path)?;
            let features = vectorizer.transform(&self.corpus);
            (vectorizer, features)
        } else {
            let params = self.word_params().with_ngram_range(1..=1);
            CountVectorizer::fit_transform(&self.corpus, params, self.fixed_vocabulary())?
        };
        log_vocabulary(vectorizer.vocabulary());
        debug!(feature_names = ?sample_names(&vectorizer.feature_names()), "Feature names");
        if !self.config.is_inference {
            persistence::save(&vectorizer, &path, true)?;
        }
        self.fitted = Some(FittedTransformer::Count(vectorizer));
        Ok(FeatureMatrix::Sparse(features))
    }

    /// Always refits on the given corpus, in either mode.
    fn sequence(&mut self) -> FeatureMatrix {
        let tokenizer = SequenceTokenizer::fit(&self.corpus);
        info!(unique_tokens = tokenizer.num_words(), "Number of unique tokens");
        let sequences = tokenizer.texts_to_sequences(&self.corpus);
        let features = pad_sequences(&sequences, self.config.max_length);
        self.fitted = Some(FittedTransformer::Sequence(tokenizer));
        FeatureMatrix::Sequences(features)
    }
}

fn sample_names<'a>(names: &[&'a str]) -> Vec<&'a str> {
    names.iter().take(2 * VOCAB_SAMPLE_SIZE).copied().collect()
}

fn log_vocabulary(vocabulary: &Vocabulary) {
    debug!(vocab_size = vocabulary.len(), "Vocab size");
    let mut sample = vocabulary.iter().collect::<Vec<_>>();
    sample.sort_by_key(|&(_, idx)| *idx);
    for (term, idx) in sample.into_iter().take(VOCAB_SAMPLE_SIZE) {
        debug!(term = %term, index = idx, "Vocab entry");
    }
}
