use crate::data::{Label, Matrix};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifier of a node inside a tree's arena.
pub type NodeId = usize;

/// Region of the input space reaching a node: feature index to
/// `(lower, upper)` bounds accumulated from the splits above it.
pub type Rules = BTreeMap<usize, (f64, f64)>;

/// The feature and threshold a node was split on.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Node<L> {
    pub num: NodeId,
    /// Samples reaching this node, feature major.
    pub data: Arc<Matrix>,
    pub labels: Arc<Vec<L>>,
    pub rules: Rules,
    /// Set once the node is known to never be split.
    pub is_stopped: bool,
    pub reach_prob: f64,
    /// Posterior over the tree's symbols, in the same order.
    pub class_prob: Vec<f64>,
    pub split: Option<Split>,
    pub parent: Option<NodeId>,
    pub left_child: Option<NodeId>,
    pub right_child: Option<NodeId>,
}

impl<L: Label> Node<L> {
    /// Create a childless node.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num: NodeId,
        data: Matrix,
        labels: Vec<L>,
        is_stopped: bool,
        reach_prob: f64,
        class_prob: Vec<f64>,
        rules: Rules,
        parent: Option<NodeId>,
    ) -> Self {
        Node {
            num,
            data: Arc::new(data),
            labels: Arc::new(labels),
            rules,
            is_stopped,
            reach_prob,
            class_prob,
            split: None,
            parent,
            left_child: None,
            right_child: None,
        }
    }

    /// Expected misclassification probability under majority-class
    /// prediction, `1 - max(class_prob)`.
    pub fn compute_error_rate(&self) -> f64 {
        1.0 - self.class_prob.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Resubstitution risk of the node if it were a leaf, R(t) = p(t) r(t).
    pub fn risk(&self) -> f64 {
        self.reach_prob * self.compute_error_rate()
    }

    pub fn is_leaf(&self) -> bool {
        self.left_child.is_none() && self.right_child.is_none()
    }

    /// Both children, `None` on a leaf.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match (self.left_child, self.right_child) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }

    /// The sibling of `child`, when `child` is one of this node's children.
    pub fn other_child(&self, child: NodeId) -> Option<NodeId> {
        if self.left_child == Some(child) {
            self.right_child
        } else if self.right_child == Some(child) {
            self.left_child
        } else {
            None
        }
    }

    /// Update all the info that is needed if this node becomes a parent.
    pub fn make_parent_node(&mut self, split: Split, left_child: NodeId, right_child: NodeId) {
        self.split = Some(split);
        self.left_child = Some(left_child);
        self.right_child = Some(right_child);
    }

    /// Turn the node back into a leaf.
    pub fn make_leaf_node(&mut self) {
        self.split = None;
        self.left_child = None;
        self.right_child = None;
    }

    pub fn n_samples(&self) -> usize {
        self.labels.len()
    }
}
