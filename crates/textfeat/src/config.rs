use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, pre_processor::Vocabulary};

/// Default padded length for [`Strategy::Sequence`].
pub const DEFAULT_MAX_LENGTH: usize = 400;

/// Feature extraction strategy.
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Character unigram + bigram TF-IDF with sublinear tf
    #[default]
    #[cfg_attr(feature = "cli", value(name = "tfidf_char"))]
    TfidfChar,
    /// Word unigram + bigram TF-IDF with sublinear tf
    #[cfg_attr(feature = "cli", value(name = "tfidf_word"))]
    TfidfWord,
    /// Lowercased word counts
    #[cfg_attr(feature = "cli", value(name = "tf_word"))]
    TfWord,
    /// Frequency-ranked word ids, padded to a fixed length
    #[cfg_attr(feature = "cli", value(name = "sequence"))]
    Sequence,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TfidfChar => "tfidf_char",
            Self::TfidfWord => "tfidf_word",
            Self::TfWord => "tf_word",
            Self::Sequence => "sequence",
        }
    }

    /// Whether the strategy stores its fitted vectorizer on disk.
    pub fn persists(self) -> bool {
        !matches!(self, Self::Sequence)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tfidf_char" => Ok(Self::TfidfChar),
            "tfidf_word" => Ok(Self::TfidfWord),
            "tf_word" => Ok(Self::TfWord),
            "sequence" | "vectorize" => Ok(Self::Sequence),
            other => Err(Error::Configuration(format!("unknown strategy {other:?}"))),
        }
    }
}

/// Locations of the newline-delimited lists loaded at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcePaths {
    pub sentence_symbols: Option<PathBuf>,
    pub stop_words: Option<PathBuf>,
}

/// Everything a [`FeatureExtractor`](crate::FeatureExtractor) needs besides the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub strategy: Strategy,
    /// Where the fitted vectorizer is saved to (training) or loaded from (inference).
    pub persistence_path: Option<PathBuf>,
    pub is_inference: bool,
    /// Fixed token to column mapping for the word strategies.
    pub vocabulary: Option<Vocabulary>,
    pub max_length: usize,
    /// Re-save the loaded `tfidf_word` vectorizer when running inference.
    pub resave_on_inference: bool,
    pub resources: ResourcePaths,
    /// Drop tokens found in the stop-word list before building word n-grams.
    pub filter_stop_words: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            persistence_path: None,
            is_inference: false,
            vocabulary: None,
            max_length: DEFAULT_MAX_LENGTH,
            resave_on_inference: false,
            resources: ResourcePaths::default(),
            filter_stop_words: false,
        }
    }
}

impl ExtractorConfig {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_persistence_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persistence_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn inference(mut self, is_inference: bool) -> Self {
        self.is_inference = is_inference;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: ResourcePaths) -> Self {
        self.resources = resources;
        self
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Checks the parameters the chosen strategy depends on.
    pub fn validate(&self) -> Result<()> {
        if self.strategy.persists() && self.persistence_path.is_none() {
            return Err(Error::Configuration(format!(
                "strategy {} requires a persistence path",
                self.strategy
            )));
        }
        if self.strategy == Strategy::Sequence && self.max_length == 0 {
            return Err(Error::Configuration(
                "max_length must be positive".to_owned(),
            ));
        }
        // Only the word strategies read the fixed vocabulary.
        if let (Strategy::TfidfWord | Strategy::TfWord, Some(vocab)) =
            (self.strategy, &self.vocabulary)
        {
            crate::pre_processor::validate_vocabulary(vocab)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips_through_names() {
        for strategy in [
            Strategy::TfidfChar,
            Strategy::TfidfWord,
            Strategy::TfWord,
            Strategy::Sequence,
        ] {
            assert_eq!(strategy.as_str().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("vectorize".parse::<Strategy>().unwrap(), Strategy::Sequence);
        assert!(matches!(
            "bm25".parse::<Strategy>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.strategy, Strategy::TfidfChar);
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
        assert!(!config.is_inference);
        assert!(!config.resave_on_inference);
    }

    #[test]
    fn test_missing_path_is_configuration_error() {
        for strategy in [Strategy::TfidfChar, Strategy::TfidfWord, Strategy::TfWord] {
            let err = ExtractorConfig::new(strategy).validate().unwrap_err();
            assert!(matches!(err, Error::Configuration(_)));
        }
        ExtractorConfig::new(Strategy::Sequence).validate().unwrap();
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let err = ExtractorConfig::new(Strategy::Sequence)
            .with_max_length(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_vocabulary_is_checked_only_where_it_is_used() {
        for strategy in [Strategy::TfidfChar, Strategy::Sequence] {
            ExtractorConfig::new(strategy)
                .with_persistence_path("unused.bin")
                .with_vocabulary(Vocabulary::default())
                .validate()
                .unwrap();
        }
        for strategy in [Strategy::TfidfWord, Strategy::TfWord] {
            let err = ExtractorConfig::new(strategy)
                .with_persistence_path("unused.bin")
                .with_vocabulary(Vocabulary::default())
                .validate()
                .unwrap_err();
            assert!(matches!(err, Error::EmptyVocabulary), "{strategy}: {err}");
        }
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"strategy": "tf_word", "persistence_path": "tf.bin", "vocabulary": {"cats": 0, "dogs": 1}}"#,
        )
        .unwrap();
        let config = ExtractorConfig::from_json_file(&path).unwrap();
        assert_eq!(config.strategy, Strategy::TfWord);
        assert_eq!(config.persistence_path, Some(PathBuf::from("tf.bin")));
        assert_eq!(config.vocabulary.as_ref().map(Vocabulary::len), Some(2));
        assert_eq!(config.max_length, DEFAULT_MAX_LENGTH);
    }
}
