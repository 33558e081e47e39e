//! # textfeat
//!
//! Configuration-driven text feature extraction. A [`FeatureExtractor`] picks one of
//! several vectorization strategies, fits it on a corpus (training) or loads a
//! previously fitted vectorizer (inference), and returns the feature matrix.
//!
//! ```no_run
//! use textfeat::{ExtractorConfig, FeatureExtractor, Strategy};
//!
//! let corpus = ["I love cats", "I love dogs", "cats and dogs"];
//! let config = ExtractorConfig::new(Strategy::TfidfWord).with_persistence_path("tfidf_word.bin");
//! let mut extractor = FeatureExtractor::new(corpus, config)?;
//! let features = extractor.extract()?;
//! assert_eq!(features.shape().0, 3);
//!
//! // later, in another process
//! let config = ExtractorConfig::new(Strategy::TfidfWord)
//!     .with_persistence_path("tfidf_word.bin")
//!     .inference(true);
//! let features = FeatureExtractor::new(["cats only"], config)?.extract()?;
//! # Ok::<(), textfeat::Error>(())
//! ```

pub mod config;
mod error;
mod extractor;
mod labels;
pub mod persistence;
pub mod pre_processor;
pub mod resources;
pub mod selection;

pub use config::{ExtractorConfig, ResourcePaths, Strategy};
pub use error::{Error, Result};
pub use extractor::{FeatureExtractor, FeatureMatrix, FittedTransformer};
pub use labels::encode_labels;
pub use selection::{ChiSquaredSelector, DEFAULT_K_BEST, select_k_best};
