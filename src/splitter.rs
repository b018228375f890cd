//! Split collaborators
//!
//! Growth does not know how thresholds are found or how posteriors are
//! estimated, it asks a [`Splitter`]. [`EmpiricalSplitter`] is a plain
//! count-based implementation.
use crate::data::{Label, Matrix};
use crate::errors::CcTreeError;
use crate::node::{Node, Rules};
use crate::utils::{class_frequencies, next_up};
use serde::{Deserialize, Serialize};

/// Child posteriors and the probability of taking each branch, as seen
/// from the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchProbabilities {
    pub left_class_prob: Vec<f64>,
    pub right_class_prob: Vec<f64>,
    pub left_prob: f64,
    pub right_prob: f64,
}

pub trait Splitter<L: Label> {
    /// Scoring configuration carried by the tree and handed back on every call.
    type Kernel;

    /// Best threshold and its score for every feature, lower scores are better.
    fn select_split(&self, node: &Node<L>, kernel: &Self::Kernel) -> Result<(Vec<f64>, Vec<f64>), CcTreeError>;

    /// Posteriors of both children and branch probabilities of a chosen split.
    fn compute_branch_probabilities(
        &self,
        node: &Node<L>,
        kernel: &Self::Kernel,
        symbols: &[L],
        threshold: f64,
        feature: usize,
    ) -> Result<BranchProbabilities, CcTreeError>;

    /// Tighten the parent's region around the threshold.
    fn derive_child_rules(&self, threshold: f64, feature: usize, node: &Node<L>) -> (Rules, Rules);

    /// Keep the samples lying inside `rules` along `feature`.
    fn partition(&self, data: &Matrix, labels: &[L], rules: &Rules, feature: usize) -> (Matrix, Vec<L>);
}

/// Impurity used by [`EmpiricalSplitter`] to score candidate thresholds.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug, Default)]
pub enum SplitCriterion {
    #[default]
    Gini,
    Entropy,
}

impl SplitCriterion {
    fn impurity(&self, counts: &[usize], n: usize) -> f64 {
        if n == 0 {
            return 0.0;
        }
        let n = n as f64;
        match self {
            SplitCriterion::Gini => 1.0 - counts.iter().map(|c| (*c as f64 / n).powi(2)).sum::<f64>(),
            SplitCriterion::Entropy => counts
                .iter()
                .filter(|c| **c > 0)
                .map(|c| {
                    let p = *c as f64 / n;
                    -p * p.ln()
                })
                .sum(),
        }
    }
}

/// Splitter working on the empirical distribution of the samples at a node.
///
/// Candidate thresholds lie between adjacent distinct values of a feature,
/// values at or below the threshold go left. Child regions are closed
/// intervals: the left one ends at the threshold, the right one starts at
/// the next representable value above it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmpiricalSplitter;

impl EmpiricalSplitter {
    pub fn new() -> Self {
        EmpiricalSplitter
    }

    /// Best threshold along a single feature, `(NaN, inf)` when the feature is constant.
    fn best_threshold(&self, values: &[f64], classes: &[usize], n_classes: usize, criterion: &SplitCriterion) -> (f64, f64) {
        let n = values.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));

        let mut total = vec![0_usize; n_classes];
        classes.iter().for_each(|c| total[*c] += 1);
        let mut left = vec![0_usize; n_classes];
        let mut right = total;

        let mut best = (f64::NAN, f64::INFINITY);
        for k in 0..n.saturating_sub(1) {
            let c = classes[order[k]];
            left[c] += 1;
            right[c] -= 1;
            let (lo, hi) = (values[order[k]], values[order[k + 1]]);
            if lo >= hi {
                continue;
            }
            let n_left = k + 1;
            let n_right = n - n_left;
            let score = (n_left as f64 * criterion.impurity(&left, n_left)
                + n_right as f64 * criterion.impurity(&right, n_right))
                / n as f64;
            if score < best.1 {
                let mid = lo + (hi - lo) / 2.0;
                best = (if mid < hi { mid } else { lo }, score);
            }
        }
        best
    }
}

impl<L: Label> Splitter<L> for EmpiricalSplitter {
    type Kernel = SplitCriterion;

    fn select_split(&self, node: &Node<L>, kernel: &SplitCriterion) -> Result<(Vec<f64>, Vec<f64>), CcTreeError> {
        let mut local: Vec<&L> = node.labels.iter().collect();
        local.sort();
        local.dedup();
        let classes: Vec<usize> = node
            .labels
            .iter()
            .map(|l| local.binary_search(&l).unwrap_or(0))
            .collect();

        let (thresholds, scores): (Vec<f64>, Vec<f64>) = (0..node.data.n_features())
            .map(|f| self.best_threshold(node.data.get_row(f), &classes, local.len(), kernel))
            .unzip();
        Ok((thresholds, scores))
    }

    fn compute_branch_probabilities(
        &self,
        node: &Node<L>,
        _kernel: &SplitCriterion,
        symbols: &[L],
        threshold: f64,
        feature: usize,
    ) -> Result<BranchProbabilities, CcTreeError> {
        if feature >= node.data.n_features() {
            return Err(CcTreeError::InvalidSplit(format!(
                "feature {} out of range for {} features",
                feature,
                node.data.n_features()
            )));
        }
        let (left, right): (Vec<(f64, &L)>, Vec<(f64, &L)>) = node
            .data
            .get_row(feature)
            .iter()
            .copied()
            .zip(node.labels.iter())
            .partition(|(x, _)| *x <= threshold);
        let left: Vec<L> = left.into_iter().map(|(_, l)| l.clone()).collect();
        let right: Vec<L> = right.into_iter().map(|(_, l)| l.clone()).collect();

        let n = node.n_samples().max(1) as f64;
        // An empty side inherits the parent posterior.
        let posterior = |labels: &[L]| {
            if labels.is_empty() {
                node.class_prob.clone()
            } else {
                class_frequencies(labels, symbols)
            }
        };
        Ok(BranchProbabilities {
            left_class_prob: posterior(&left[..]),
            right_class_prob: posterior(&right[..]),
            left_prob: left.len() as f64 / n,
            right_prob: right.len() as f64 / n,
        })
    }

    fn derive_child_rules(&self, threshold: f64, feature: usize, node: &Node<L>) -> (Rules, Rules) {
        let (lower, upper) = node
            .rules
            .get(&feature)
            .copied()
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        let mut left_rules = node.rules.clone();
        let mut right_rules = node.rules.clone();
        left_rules.insert(feature, (lower, threshold.min(upper)));
        right_rules.insert(feature, (next_up(threshold).max(lower), upper));
        (left_rules, right_rules)
    }

    fn partition(&self, data: &Matrix, labels: &[L], rules: &Rules, feature: usize) -> (Matrix, Vec<L>) {
        let (lower, upper) = rules
            .get(&feature)
            .copied()
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
        let keep: Vec<usize> = data
            .get_row(feature)
            .iter()
            .enumerate()
            .filter(|(_, x)| lower <= **x && **x <= upper)
            .map(|(j, _)| j)
            .collect();
        let subset_labels = keep.iter().map(|j| labels[*j].clone()).collect();
        (data.select_cols(&keep), subset_labels)
    }
}
