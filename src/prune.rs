//! Pruning
//!
//! Subtree removal and minimal cost-complexity pruning. Every tree in a
//! pruning sequence is an independent value, the node subsets are shared
//! between them through `Arc` so a copy only duplicates node metadata.
use crate::data::Label;
use crate::errors::CcTreeError;
use crate::node::NodeId;
use crate::tree::Tree;
use log::{debug, info};
use std::collections::BTreeSet;

/// Result of [`Tree::remove_subtree`].
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// Ids of the deleted descendants, level by level.
    Removed(Vec<NodeId>),
    /// The node was already a leaf, nothing changed.
    AlreadyLeaf,
}

/// Result of [`Tree::cut_useless_leaves`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutReport {
    /// Ids of the leaves that were cut.
    pub removed: Vec<NodeId>,
}

impl CutReport {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// One element of a cost-complexity pruning path.
#[derive(Debug, Clone)]
pub struct PruneStep<L, K> {
    /// Complexity parameter at which this tree becomes optimal, 0 for the
    /// first tree.
    pub alpha: f64,
    /// Node collapsed to obtain this tree from the previous one.
    pub pruned_node: Option<NodeId>,
    pub tree: Tree<L, K>,
}

impl<L: Label, K> Tree<L, K> {
    /// Remove every strict descendant of `node_index` and make it a leaf.
    ///
    /// Asking to prune a leaf is not an error, it returns
    /// [`RemoveOutcome::AlreadyLeaf`] and leaves the tree untouched.
    pub fn remove_subtree(&mut self, node_index: NodeId) -> Result<RemoveOutcome, CcTreeError> {
        let node_list = self.descendants(node_index)?;
        if node_list.is_empty() {
            debug!("Node {} is a leaf, nothing to prune.", node_index);
            return Ok(RemoveOutcome::AlreadyLeaf);
        }

        for idx in node_list.iter() {
            self.nodes.remove(idx);
            self.leaf_inds.remove(idx);
        }
        if let Some(root) = self.nodes.get_mut(&node_index) {
            root.make_leaf_node();
        }
        self.leaf_inds.insert(node_index);
        Ok(RemoveOutcome::Removed(node_list))
    }

    /// Pairs of leaves sharing the same parent.
    ///
    /// Every leaf appears in at most one pair.
    pub fn leaf_siblings(&self) -> Vec<(NodeId, NodeId)> {
        let mut siblings = Vec::new();
        let mut not_visited: BTreeSet<NodeId> = self.leaf_inds.clone();
        while let Some(curr_leaf) = not_visited.pop_first() {
            let other_child = self.nodes[&curr_leaf]
                .parent
                .and_then(|p| self.nodes[&p].other_child(curr_leaf));
            if let Some(other) = other_child {
                if not_visited.remove(&other) {
                    siblings.push((curr_leaf, other));
                }
            }
        }
        siblings
    }

    /// Cut sibling leaves whose split did not lower the error rate.
    ///
    /// A split is useless when the parent's error rate equals the
    /// reach-weighted average error rate of its two leaf children, up to
    /// `config.useless_split_tolerance`. Both children are removed and the
    /// parent becomes a leaf again. One pass only, a parent turned into a
    /// leaf is not reconsidered. Parents that are never reached are skipped.
    pub fn cut_useless_leaves(&mut self) -> Result<CutReport, CcTreeError> {
        self.config.validate()?;
        let tolerance = self.config.useless_split_tolerance;
        let mut report = CutReport::default();
        for (left, right) in self.leaf_siblings() {
            let Some(parent) = self.nodes[&left].parent else {
                continue;
            };
            let parent_node = &self.nodes[&parent];
            if parent_node.reach_prob <= 0.0 {
                debug!("Node {} has zero reach probability, split kept.", parent);
                continue;
            }
            let children_error =
                (self.nodes[&left].risk() + self.nodes[&right].risk()) / parent_node.reach_prob;
            if (parent_node.compute_error_rate() - children_error).abs() <= tolerance {
                self.remove_subtree(parent)?;
                report.removed.extend([left, right]);
            }
        }
        info!("{} leaves have been cut from the tree.", report.count());
        Ok(report)
    }

    /// Internal node with the smallest link strength and that strength.
    ///
    /// The strength of node t is `g(t) = (e(t) - R(T_t)) / (|T_t| - 1)`, where
    /// e(t) is the node's error rate and R(T_t), |T_t| the risk and leaf count
    /// of its subtree. With `config.weighted_link_strength`, e(t) is replaced
    /// by the node's risk. Leaves never qualify. Ties go to the smallest id.
    /// Returns `None` when the tree is a single leaf.
    pub fn weakest_link(&self) -> Result<Option<(NodeId, f64)>, CcTreeError> {
        let mut best: Option<(NodeId, f64)> = None;
        for (idx, node) in self.nodes.iter() {
            if node.is_leaf() {
                continue;
            }
            let node_risk = if self.config.weighted_link_strength {
                node.risk()
            } else {
                node.compute_error_rate()
            };
            let (subtree_risk, sub_leaves) = self.subtree_props(*idx)?;
            if subtree_risk > node_risk + self.config.risk_tolerance {
                return Err(CcTreeError::SubtreeRiskExceedsNode {
                    node: *idx,
                    subtree_risk,
                    node_risk,
                });
            }
            if sub_leaves.len() < 2 {
                return Err(CcTreeError::DegenerateSubtree {
                    node: *idx,
                    n_leaves: sub_leaves.len(),
                });
            }
            let link = (node_risk - subtree_risk) / (sub_leaves.len() - 1) as f64;
            best = match best {
                Some((b, b_link)) if b_link < link || (b_link == link && b < *idx) => Some((b, b_link)),
                _ => Some((*idx, link)),
            };
        }
        Ok(best)
    }
}

impl<L: Label, K: Clone> Tree<L, K> {
    /// Minimal cost-complexity pruning path.
    ///
    /// Useless leaves are cut from `self` first. The path starts with a copy
    /// of the cleaned tree, each following step collapses the weakest link of
    /// the previous tree, and the last step is the root alone.
    pub fn cost_complexity_path(&mut self) -> Result<Vec<PruneStep<L, K>>, CcTreeError> {
        let cut = self.cut_useless_leaves()?;

        let mut path = vec![PruneStep {
            alpha: 0.0,
            pruned_node: None,
            tree: self.clone(),
        }];
        let mut t = self.clone();
        while t.n_nodes() > 1 {
            let Some((weakest, alpha)) = t.weakest_link()? else {
                break;
            };
            t.remove_subtree(weakest)?;
            debug!(
                "Collapsed node {} at alpha {}, {} nodes left.",
                weakest,
                alpha,
                t.n_nodes()
            );
            path.push(PruneStep {
                alpha,
                pruned_node: Some(weakest),
                tree: t.clone(),
            });
        }
        info!(
            "Cost-complexity sequence of {} trees, {} useless leaves cut beforehand.",
            path.len(),
            cut.count()
        );
        Ok(path)
    }

    /// Nested sequence of trees from the cleaned full tree down to its root.
    pub fn cost_complexity_seq(&mut self) -> Result<Vec<Tree<L, K>>, CcTreeError> {
        Ok(self.cost_complexity_path()?.into_iter().map(|step| step.tree).collect())
    }
}
