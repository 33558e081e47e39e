use std::collections::BTreeSet;

use ahash::HashMap;

use super::params::{Analyzer, VectorizerParams};

fn join(window: &[String], analyzer: Analyzer) -> String {
    match analyzer {
        Analyzer::Word => window.join(" "),
        Analyzer::Char => window.concat(),
    }
}

pub fn count_ngrams(tokens: &[String], params: &VectorizerParams) -> HashMap<String, usize> {
    let mut ngram_counter = HashMap::default();

    for &n in params.ngram_counts() {
        for window in tokens.windows(n) {
            *ngram_counter
                .entry(join(window, params.analyzer()))
                .or_insert(0) += 1;
        }
    }
    ngram_counter
}

/// Every n-gram seen in the tokenized corpus, sorted lexicographically.
pub fn distinct_ngrams(ngram_maps: &[HashMap<String, usize>]) -> Vec<String> {
    ngram_maps
        .iter()
        .flat_map(|ngrams| ngrams.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| (*w).to_owned()).collect()
    }

    #[test]
    fn test_word_unigrams_and_bigrams() {
        let counts = count_ngrams(&tokens(&["a", "b", "a", "b"]), &VectorizerParams::word());
        assert_eq!(counts["a"], 2);
        assert_eq!(counts["a b"], 2);
        assert_eq!(counts["b a"], 1);
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn test_char_bigrams_are_concatenated() {
        let counts = count_ngrams(&tokens(&["猫", "狗"]), &VectorizerParams::char());
        assert_eq!(counts["猫狗"], 1);
        assert!(!counts.contains_key("猫 狗"));
    }

    #[test]
    fn test_short_documents_have_no_bigrams() {
        let counts = count_ngrams(&tokens(&["solo"]), &VectorizerParams::word());
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_distinct_ngrams_are_sorted() {
        let params = VectorizerParams::word().with_ngram_range(1..=1);
        let maps = vec![
            count_ngrams(&tokens(&["b", "a", "b"]), &params),
            count_ngrams(&tokens(&["a", "c"]), &params),
        ];
        assert_eq!(distinct_ngrams(&maps), tokens(&["a", "b", "c"]));
    }
}
