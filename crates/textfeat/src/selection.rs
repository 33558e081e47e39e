//! Chi-squared univariate feature selection.

use std::collections::BTreeSet;

use ahash::HashMap;
use sprs::CsMat;
use tracing::debug;

use crate::{Error, Result};

/// Number of columns kept by [`select_k_best`] when callers have no better figure.
pub const DEFAULT_K_BEST: usize = 10_000;

/// Column selection learned by [`select_k_best`], reusable on unseen data.
#[derive(bincode::Encode, bincode::Decode, serde::Serialize, serde::Deserialize)]
#[derive(Clone, Debug, PartialEq)]
pub struct ChiSquaredSelector {
    scores: Vec<f64>,
    /// Kept column indices, ascending
    selected: Vec<usize>,
}

impl ChiSquaredSelector {
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn num_input_features(&self) -> usize {
        self.scores.len()
    }

    /// Keeps the selected columns of `matrix`, in their original order.
    pub fn transform(&self, matrix: &CsMat<f64>) -> Result<CsMat<f64>> {
        if matrix.cols() != self.num_input_features() {
            return Err(Error::InvalidInput(format!(
                "expected {} columns, got {}",
                self.num_input_features(),
                matrix.cols()
            )));
        }

        let mut column_map = vec![None; matrix.cols()];
        for (new_idx, &old_idx) in self.selected.iter().enumerate() {
            column_map[old_idx] = Some(new_idx);
        }

        let csr = matrix.to_csr();
        let mut indptr = Vec::with_capacity(csr.rows() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for row in csr.outer_iterator() {
            for (col_idx, &val) in row.iter() {
                if let Some(new_idx) = column_map[col_idx] {
                    indices.push(new_idx);
                    data.push(val);
                }
            }
            indptr.push(indices.len());
        }
        Ok(CsMat::new(
            (csr.rows(), self.selected.len()),
            indptr,
            indices,
            data,
        ))
    }
}

/// Chi-squared statistic of every column against the class labels.
///
/// Columns with a zero expected frequency for a class contribute nothing for that class.
/// Labels only need to be distinct per class; they do not have to be contiguous.
pub fn chi2_scores(matrix: &CsMat<f64>, labels: &[usize]) -> Result<Vec<f64>> {
    if labels.len() != matrix.rows() {
        return Err(Error::InvalidInput(format!(
            "{} labels for {} rows",
            labels.len(),
            matrix.rows()
        )));
    }
    if matrix.data().iter().any(|&v| v < 0.0) {
        return Err(Error::InvalidInput(
            "chi-squared requires non-negative features".to_owned(),
        ));
    }

    // Dense class rows are indexed by rank among the distinct labels, not by label value.
    let classes = labels
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(class, label)| (label, class))
        .collect::<HashMap<_, _>>();
    let n_classes = classes.len();
    let n_features = matrix.cols();
    let mut observed = vec![vec![0.0; n_features]; n_classes];
    let mut class_counts = vec![0usize; n_classes];
    let mut feature_totals = vec![0.0; n_features];

    let csr = matrix.to_csr();
    for (row, label) in csr.outer_iterator().zip(labels) {
        let class = classes[label];
        class_counts[class] += 1;
        for (col_idx, &val) in row.iter() {
            observed[class][col_idx] += val;
            feature_totals[col_idx] += val;
        }
    }

    let n_rows = labels.len() as f64;
    let mut scores = vec![0.0; n_features];
    for (class_observed, &count) in observed.iter().zip(&class_counts) {
        let prior = count as f64 / n_rows;
        for (col_idx, score) in scores.iter_mut().enumerate() {
            let expected = prior * feature_totals[col_idx];
            if expected > 0.0 {
                let diff = class_observed[col_idx] - expected;
                *score += diff * diff / expected;
            }
        }
    }
    Ok(scores)
}

/// Keeps the `k` columns with the highest chi-squared score against `labels`.
///
/// `k` larger than the number of columns keeps every column. Ties favour the lower column index.
pub fn select_k_best(
    matrix: &CsMat<f64>,
    labels: &[usize],
    k: usize,
) -> Result<(CsMat<f64>, ChiSquaredSelector)> {
    let scores = chi2_scores(matrix, labels)?;
    let k = k.min(scores.len());

    let mut ranked = (0..scores.len()).collect::<Vec<_>>();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    let mut selected = ranked.into_iter().take(k).collect::<Vec<_>>();
    selected.sort_unstable();
    debug!(
        input_features = scores.len(),
        selected = selected.len(),
        "Chi-squared selection complete"
    );

    let selector = ChiSquaredSelector { scores, selected };
    let reduced = selector.transform(matrix)?;
    Ok((reduced, selector))
}
