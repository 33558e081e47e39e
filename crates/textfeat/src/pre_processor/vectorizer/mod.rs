mod count_vectorizer;
mod ngrams;
mod params;
mod sequence;
mod tfidf_vectorizer;
mod tokenizer;

pub use count_vectorizer::{CountVectorizer, Vocabulary, validate_vocabulary};
pub use params::{Analyzer, VectorizerParams};
pub use sequence::{PADDING_VALUE, SequenceTokenizer, pad_sequences};
pub use tfidf_vectorizer::TfidfVectorizer;
pub use tokenizer::segment_chars;
