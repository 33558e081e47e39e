//! Text vectorization primitives: count and TF-IDF vectorizers over word or character
//! n-grams, and frequency-ranked integer sequences.

mod vectorizer;

pub use vectorizer::{
    Analyzer, CountVectorizer, PADDING_VALUE, SequenceTokenizer, TfidfVectorizer,
    VectorizerParams, Vocabulary, pad_sequences, segment_chars, validate_vocabulary,
};
