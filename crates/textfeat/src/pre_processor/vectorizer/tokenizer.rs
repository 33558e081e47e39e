use std::{borrow::Cow, sync::LazyLock};

use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use regex::Regex;
use tracing::debug;

use super::params::{Analyzer, VectorizerParams};

/// Minimum number of texts before a progress bar is drawn
const MIN_TEXTS_FOR_PROGRESS: usize = 1_000;

/// Characters stripped by the sequence tokenizer before splitting on whitespace.
const SEQUENCE_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

fn progress_bar_setup(len: usize, message: impl Into<Cow<'static, str>>) -> ProgressBar {
    if len < MIN_TEXTS_FOR_PROGRESS {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message);
    pb
}

/// Splits every entry into its characters, dropping whitespace and joining the rest with single spaces.
///
/// `"ab c"` becomes `"a b c"`, which lets a word tokenizer operate at character granularity.
pub fn segment_chars<T: AsRef<str>>(texts: &[T]) -> Vec<String> {
    texts
        .iter()
        .map(|text| {
            let mut out = String::with_capacity(text.as_ref().len() * 2);
            for ch in text.as_ref().chars().filter(|c| !c.is_whitespace()) {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push(ch);
            }
            out
        })
        .collect()
}

/// Turns a single document into the units n-grams are formed from.
pub fn analyze(text: &str, params: &VectorizerParams) -> Vec<String> {
    let text = text.to_lowercase();
    let units = match params.analyzer() {
        Analyzer::Word => WORD_RE
            .find_iter(&text)
            .map(|m| m.as_str().to_owned())
            .collect::<Vec<_>>(),
        Analyzer::Char => text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(String::from)
            .collect(),
    };
    units
        .into_iter()
        .filter(|unit| !params.is_stop_word(unit))
        .collect()
}

pub fn tokenize<T: AsRef<str>>(texts: &[T], params: &VectorizerParams) -> Vec<Vec<String>> {
    debug!(num_texts = texts.len(), analyzer = ?params.analyzer(), "Tokenizing texts");
    let pb = progress_bar_setup(texts.len(), "Tokenizing texts");
    let result = texts
        .iter()
        .progress_with(pb.clone())
        .map(|text| analyze(text.as_ref(), params))
        .collect();
    pb.finish_and_clear();
    result
}

/// Lowercases, replaces punctuation with spaces and splits on whitespace.
pub fn sequence_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if SEQUENCE_FILTERS.contains(c) { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_chars() {
        let segmented = segment_chars(&["ab c", "  ", "猫狗"]);
        assert_eq!(segmented, vec!["a b c", "", "猫 狗"]);
    }

    #[test]
    fn test_analyze_words_lowercases() {
        let tokens = analyze("I love Cats, dogs!", &VectorizerParams::word());
        assert_eq!(tokens, vec!["i", "love", "cats", "dogs"]);
    }

    #[test]
    fn test_analyze_chars_skips_whitespace() {
        let tokens = analyze("a B c", &VectorizerParams::char());
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_analyze_drops_stop_words() {
        let params = VectorizerParams::word().with_stop_words(&["and"]);
        assert_eq!(analyze("cats and dogs", &params), vec!["cats", "dogs"]);
    }

    #[test]
    fn test_sequence_words_strip_punctuation() {
        assert_eq!(
            sequence_words("Hello, World! it's-fine"),
            vec!["hello", "world", "it's", "fine"]
        );
    }
}
