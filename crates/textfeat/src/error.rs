use std::path::PathBuf;

/// Errors raised while configuring, fitting, persisting or applying a feature extractor.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A parameter required by the chosen strategy is missing or invalid.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// A persisted vectorizer or resource list does not exist.
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),
    /// Fitting produced no terms, e.g. an empty corpus with no fixed vocabulary.
    #[error("empty vocabulary; the corpus contains no usable terms")]
    EmptyVocabulary,
    /// Feature selection preconditions were violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode vectorizer: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode vectorizer: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// The bytes hold a complete value followed by data of some other shape.
    #[error("failed to decode vectorizer: {0} unexpected trailing bytes")]
    TrailingBytes(usize),
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
