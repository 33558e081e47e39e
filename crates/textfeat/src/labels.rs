use std::collections::BTreeSet;

use ahash::HashMap;
use tracing::info;

/// Encodes labels as the rank of each label among the sorted distinct labels.
///
/// Each call is independent: the mapping is rebuilt from `labels` every time.
pub fn encode_labels<S: AsRef<str>>(labels: &[S]) -> Vec<usize> {
    let classes = labels
        .iter()
        .map(AsRef::as_ref)
        .collect::<BTreeSet<&str>>();
    let index = classes
        .into_iter()
        .enumerate()
        .map(|(idx, class)| (class, idx))
        .collect::<HashMap<&str, usize>>();
    let encoded = labels
        .iter()
        .map(|label| index[label.as_ref()])
        .collect::<Vec<_>>();
    info!(
        rows = encoded.len(),
        classes = index.len(),
        "Encoded labels"
    );
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_ranked_by_sort_order() {
        let encoded = encode_labels(&["spam", "ham", "spam", "eggs"]);
        assert_eq!(encoded, vec![2, 1, 2, 0]);
    }

    #[test]
    fn test_encoding_is_bijective() {
        let labels = ["b", "a", "c", "a"];
        let encoded = encode_labels(&labels);
        for (i, j) in (0..labels.len()).flat_map(|i| (0..labels.len()).map(move |j| (i, j))) {
            assert_eq!(labels[i] == labels[j], encoded[i] == encoded[j]);
        }
    }

    #[test]
    fn test_empty_labels() {
        let labels: [&str; 0] = [];
        assert!(encode_labels(&labels).is_empty());
    }
}
