use crate::config::TreeConfig;
use crate::constants::{PROBABILITY_TOLERANCE, ROOT_ID};
use crate::data::{Label, Matrix};
use crate::errors::CcTreeError;
use crate::node::{Node, NodeId, Rules, Split};
use crate::splitter::Splitter;
use crate::utils::{argmin, class_frequencies, is_distribution, n_distinct};
use hashbrown::HashMap;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;

/// Summary of a call to [`Tree::fit_full_tree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthReport {
    /// Number of level-synchronous passes over the leaves.
    pub passes: usize,
    /// Number of leaves turned into parents.
    pub splits: usize,
    /// Impure leaves that could not be separated and were stopped as they are.
    pub unsplittable: Vec<NodeId>,
}

/// Binary classification tree stored as an arena of nodes keyed by id.
///
/// `K` is the split configuration handed to the [`Splitter`] on every
/// call, the tree never looks inside it.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Tree<L, K> {
    /// Sorted distinct class labels, fixed at construction.
    pub symbols: Vec<L>,
    pub kernel: K,
    pub nodes: HashMap<NodeId, Node<L>>,
    /// Ids of the nodes without children.
    pub leaf_inds: BTreeSet<NodeId>,
    next_id: NodeId,
    #[serde(default)]
    pub config: TreeConfig,
}

impl<L: Label, K> Tree<L, K> {
    /// Create a tree holding only its root.
    ///
    /// * `data` - Feature major matrix, one column per sample.
    /// * `labels` - One label per sample.
    /// * `kernel` - Split configuration passed through to the splitter.
    pub fn new(data: Matrix, labels: Vec<L>, kernel: K) -> Result<Self, CcTreeError> {
        if data.n_samples() != labels.len() {
            return Err(CcTreeError::ShapeMismatch(data.n_samples(), labels.len()));
        }
        if labels.is_empty() {
            return Err(CcTreeError::EmptyData);
        }

        let mut symbols = labels.clone();
        symbols.sort();
        symbols.dedup();
        let class_prob = class_frequencies(&labels, &symbols);
        let is_stopped = symbols.len() == 1;

        let mut rules = Rules::new();
        for f in 0..data.n_features() {
            if let Some(bounds) = data.row_bounds(f) {
                rules.insert(f, bounds);
            }
        }

        let root = Node::new(ROOT_ID, data, labels, is_stopped, 1.0, class_prob, rules, None);
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, root);

        Ok(Tree {
            symbols,
            kernel,
            nodes,
            leaf_inds: BTreeSet::from([ROOT_ID]),
            next_id: ROOT_ID + 1,
            config: TreeConfig::default(),
        })
    }

    /// Create a tree from flat values and their shape, `[samples]` or
    /// `[features, samples]`.
    pub fn from_shape(values: Vec<f64>, shape: &[usize], labels: Vec<L>, kernel: K) -> Result<Self, CcTreeError> {
        let data = Matrix::from_shape(values, shape)?;
        Self::new(data, labels, kernel)
    }

    pub fn root(&self) -> &Node<L> {
        &self.nodes[&ROOT_ID]
    }

    pub fn get_node(&self, idx: NodeId) -> Result<&Node<L>, CcTreeError> {
        self.nodes.get(&idx).ok_or(CcTreeError::NodeNotFound(idx))
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.leaf_inds.len()
    }

    pub fn n_features(&self) -> usize {
        self.root().data.n_features()
    }

    /// Leaves in increasing id order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node<L>> + '_ {
        self.leaf_inds.iter().map(move |i| &self.nodes[i])
    }

    /// Length of the longest root to leaf path.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut level = vec![ROOT_ID];
        loop {
            let next: Vec<NodeId> = level
                .iter()
                .filter_map(|i| self.nodes[i].children())
                .flat_map(|(l, r)| [l, r])
                .collect();
            if next.is_empty() {
                return depth;
            }
            depth += 1;
            level = next;
        }
    }

    /// True when no leaf is left to split.
    pub fn is_fully_stopped(&self) -> bool {
        self.leaves().all(|n| n.is_stopped)
    }

    /// Grow the tree until every leaf is stopped.
    ///
    /// Each pass splits every leaf that is not stopped at the start of the
    /// pass, passes repeat until none is left. Children are stopped when
    /// their labels are pure. A leaf that cannot be separated (no finite
    /// score, or a side with no samples) is stopped as it is and reported
    /// in [`GrowthReport::unsplittable`].
    pub fn fit_full_tree<S>(&mut self, splitter: &S) -> Result<GrowthReport, CcTreeError>
    where
        S: Splitter<L, Kernel = K>,
    {
        let mut report = GrowthReport::default();
        loop {
            let growable: Vec<NodeId> = self
                .leaf_inds
                .iter()
                .copied()
                .filter(|i| !self.nodes[i].is_stopped)
                .collect();
            if growable.is_empty() {
                break;
            }
            report.passes += 1;
            for idx in growable {
                match self.split_leaf(idx, splitter)? {
                    Some(_) => report.splits += 1,
                    None => report.unsplittable.push(idx),
                }
            }
        }
        info!(
            "Full tree grown in {} passes: {} nodes, {} leaves, {} unsplittable.",
            report.passes,
            self.n_nodes(),
            self.n_leaves(),
            report.unsplittable.len()
        );
        Ok(report)
    }

    /// Split one leaf in two, returning the ids of the new children.
    fn split_leaf<S>(&mut self, idx: NodeId, splitter: &S) -> Result<Option<(NodeId, NodeId)>, CcTreeError>
    where
        S: Splitter<L, Kernel = K>,
    {
        let node = self.get_node(idx)?;
        let (thresholds, scores) = splitter.select_split(node, &self.kernel)?;
        if thresholds.len() != scores.len() {
            return Err(CcTreeError::InvalidSplit(format!(
                "{} thresholds for {} scores",
                thresholds.len(),
                scores.len()
            )));
        }
        let feature = match argmin(&scores) {
            Some(f) if scores[f] < f64::INFINITY && !thresholds[f].is_nan() => f,
            _ => {
                self.stop_unsplittable(idx, "no feature separates its samples");
                return Ok(None);
            }
        };
        let threshold = thresholds[feature];

        let probs = splitter.compute_branch_probabilities(node, &self.kernel, &self.symbols, threshold, feature)?;
        let n_symbols = self.symbols.len();
        if !is_distribution(&probs.left_class_prob, n_symbols, PROBABILITY_TOLERANCE)
            || !is_distribution(&probs.right_class_prob, n_symbols, PROBABILITY_TOLERANCE)
        {
            return Err(CcTreeError::InvalidSplit(format!(
                "child posteriors of node {} are not distributions over {} symbols",
                idx, n_symbols
            )));
        }
        if !is_distribution(&[probs.left_prob, probs.right_prob], 2, PROBABILITY_TOLERANCE) {
            return Err(CcTreeError::InvalidSplit(format!(
                "branch probabilities {} and {} of node {} do not sum to one",
                probs.left_prob, probs.right_prob, idx
            )));
        }

        let (left_rules, right_rules) = splitter.derive_child_rules(threshold, feature, node);
        let (left_data, left_labels) = splitter.partition(&node.data, &node.labels, &left_rules, feature);
        let (right_data, right_labels) = splitter.partition(&node.data, &node.labels, &right_rules, feature);
        if left_labels.len() + right_labels.len() != node.n_samples() {
            return Err(CcTreeError::InvalidSplit(format!(
                "node {} with {} samples partitioned into {} and {}",
                idx,
                node.n_samples(),
                left_labels.len(),
                right_labels.len()
            )));
        }
        if left_labels.is_empty() || right_labels.is_empty() {
            self.stop_unsplittable(idx, "the best split leaves a child without samples");
            return Ok(None);
        }

        let left_reach_prob = probs.left_prob * node.reach_prob;
        let right_reach_prob = probs.right_prob * node.reach_prob;
        let is_left_stopped = n_distinct(&left_labels) == 1;
        let is_right_stopped = n_distinct(&right_labels) == 1;

        let left_id = self.next_id;
        let right_id = self.next_id + 1;
        self.next_id += 2;

        let left = Node::new(
            left_id,
            left_data,
            left_labels,
            is_left_stopped,
            left_reach_prob,
            probs.left_class_prob,
            left_rules,
            Some(idx),
        );
        let right = Node::new(
            right_id,
            right_data,
            right_labels,
            is_right_stopped,
            right_reach_prob,
            probs.right_class_prob,
            right_rules,
            Some(idx),
        );
        debug!(
            "Split node {} on feature {} at {}: left {} ({} samples), right {} ({} samples).",
            idx,
            feature,
            threshold,
            left_id,
            left.n_samples(),
            right_id,
            right.n_samples()
        );

        if let Some(parent) = self.nodes.get_mut(&idx) {
            parent.make_parent_node(Split { feature, threshold }, left_id, right_id);
        }
        self.nodes.insert(left_id, left);
        self.nodes.insert(right_id, right);
        self.leaf_inds.remove(&idx);
        self.leaf_inds.insert(left_id);
        self.leaf_inds.insert(right_id);
        Ok(Some((left_id, right_id)))
    }

    fn stop_unsplittable(&mut self, idx: NodeId, reason: &str) {
        warn!("Node {} is impure but cannot be split, {}.", idx, reason);
        if let Some(node) = self.nodes.get_mut(&idx) {
            node.is_stopped = true;
        }
    }
}

impl<L, K> Tree<L, K>
where
    L: Label + Serialize + DeserializeOwned,
    K: Serialize + DeserializeOwned,
{
    /// Dump a tree as a json object
    pub fn json_dump(&self) -> Result<String, CcTreeError> {
        serde_json::to_string(self).map_err(|e| CcTreeError::UnableToWrite(e.to_string()))
    }

    /// Load a tree from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    pub fn from_json(json_str: &str) -> Result<Self, CcTreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| CcTreeError::UnableToRead(e.to_string()))
    }

    /// Save a tree as a json object to a file.
    ///
    /// * `path` - Path to save tree.
    pub fn save_tree(&self, path: &str) -> Result<(), CcTreeError> {
        let model = self.json_dump()?;
        fs::write(path, model).map_err(|e| CcTreeError::UnableToWrite(e.to_string()))
    }

    /// Load a tree from a path to a json tree object.
    ///
    /// * `path` - Path to load tree from.
    pub fn load_tree(path: &str) -> Result<Self, CcTreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| CcTreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

/// Save a whole pruning sequence as a json array.
pub fn save_sequence<L, K>(trees: &[Tree<L, K>], path: &str) -> Result<(), CcTreeError>
where
    L: Serialize,
    K: Serialize,
{
    let s = serde_json::to_string(trees).map_err(|e| CcTreeError::UnableToWrite(e.to_string()))?;
    fs::write(path, s).map_err(|e| CcTreeError::UnableToWrite(e.to_string()))
}

/// Load a pruning sequence written by [`save_sequence`].
pub fn load_sequence<L, K>(path: &str) -> Result<Vec<Tree<L, K>>, CcTreeError>
where
    L: DeserializeOwned,
    K: DeserializeOwned,
{
    let json_str = fs::read_to_string(path).map_err(|e| CcTreeError::UnableToRead(e.to_string()))?;
    serde_json::from_str(&json_str).map_err(|e| CcTreeError::UnableToRead(e.to_string()))
}
