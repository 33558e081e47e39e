use ahash::HashMap;
use ndarray::Array2;
use tracing::debug;

use super::tokenizer::sequence_words;

/// Value used to left-pad sequences shorter than the target length.
pub const PADDING_VALUE: u32 = 0;

/// Maps words to integer ids ranked by corpus frequency.
///
/// The most frequent word gets id 1; ties keep first-seen order. Id 0 is reserved for padding.
#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, Default)]
pub struct SequenceTokenizer {
    word_index: HashMap<String, u32>,
}

impl SequenceTokenizer {
    pub fn fit<T: AsRef<str>>(texts: &[T]) -> Self {
        let mut order = Vec::new();
        let mut counts = HashMap::<String, usize>::default();
        for text in texts {
            for word in sequence_words(text.as_ref()) {
                let count = counts.entry(word.clone()).or_insert_with(|| {
                    order.push(word);
                    0
                });
                *count += 1;
            }
        }

        // stable sort keeps first-seen order among equal counts
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        let word_index = order
            .into_iter()
            .zip(1u32..)
            .collect::<HashMap<String, u32>>();
        debug!(unique_tokens = word_index.len(), "SequenceTokenizer fitted");
        Self { word_index }
    }

    /// Encodes each text as word ids; unknown words are skipped.
    pub fn texts_to_sequences<T: AsRef<str>>(&self, texts: &[T]) -> Vec<Vec<u32>> {
        texts
            .iter()
            .map(|text| {
                sequence_words(text.as_ref())
                    .iter()
                    .filter_map(|word| self.word_index.get(word).copied())
                    .collect()
            })
            .collect()
    }

    pub fn word_index(&self) -> &HashMap<String, u32> {
        &self.word_index
    }

    pub fn num_words(&self) -> usize {
        self.word_index.len()
    }
}

/// Left-pads short sequences with [`PADDING_VALUE`] and keeps the last `max_length` ids of long ones.
pub fn pad_sequences(sequences: &[Vec<u32>], max_length: usize) -> Array2<u32> {
    let mut padded = Array2::from_elem((sequences.len(), max_length), PADDING_VALUE);
    for (mut row, seq) in padded.outer_iter_mut().zip(sequences) {
        let kept = &seq[seq.len().saturating_sub(max_length)..];
        let offset = max_length - kept.len();
        for (slot, &id) in row.iter_mut().skip(offset).zip(kept) {
            *slot = id;
        }
    }
    padded
}
