use super::tree::Tree;
use crate::data::Label;
use crate::errors::CcTreeError;
use crate::node::NodeId;

impl<L: Label, K> Tree<L, K> {
    /// Expected misclassification probability of the tree, R(T): the
    /// reach-weighted error rate summed over the leaves.
    pub fn total_misclass_rate(&self) -> f64 {
        self.leaves().map(|leaf| leaf.risk()).sum()
    }

    /// Risk and leaves of the subtree rooted at `node_index`, R(T_t).
    ///
    /// A leaf is its own subtree. Leaves are listed level by level, left
    /// to right.
    pub fn subtree_props(&self, node_index: NodeId) -> Result<(f64, Vec<NodeId>), CcTreeError> {
        let sub_root = self.get_node(node_index)?;
        let Some((left, right)) = sub_root.children() else {
            return Ok((sub_root.risk(), vec![node_index]));
        };

        let mut sub_misclass_rate = 0.0;
        let mut leaf_list = Vec::new();
        let mut rem_nodes = vec![left, right];
        while !rem_nodes.is_empty() {
            let mut new_nodes = Vec::new();
            for idx in rem_nodes {
                let node = self.get_node(idx)?;
                match node.children() {
                    Some((l, r)) => new_nodes.extend([l, r]),
                    None => {
                        sub_misclass_rate += node.risk();
                        leaf_list.push(idx);
                    }
                }
            }
            rem_nodes = new_nodes;
        }
        Ok((sub_misclass_rate, leaf_list))
    }

    /// Every strict descendant of `node_index`, level by level.
    pub fn descendants(&self, node_index: NodeId) -> Result<Vec<NodeId>, CcTreeError> {
        let mut node_list = Vec::new();
        let mut rem_nodes: Vec<NodeId> = self
            .get_node(node_index)?
            .children()
            .map(|(l, r)| vec![l, r])
            .unwrap_or_default();
        while !rem_nodes.is_empty() {
            let mut new_rem_nodes = Vec::new();
            for idx in rem_nodes {
                node_list.push(idx);
                if let Some((l, r)) = self.get_node(idx)?.children() {
                    new_rem_nodes.extend([l, r]);
                }
            }
            rem_nodes = new_rem_nodes;
        }
        Ok(node_list)
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::ROOT_ID;
    use crate::errors::CcTreeError;
    use crate::splitter::{EmpiricalSplitter, SplitCriterion};
    use crate::tree::test_utils::random_dataset;
    use crate::tree::Tree;
    use crate::utils::precision_round;
    use std::error::Error;

    fn grown(seed: u64) -> Result<Tree<u32, SplitCriterion>, Box<dyn Error>> {
        let (data, labels) = random_dataset(2, 120, 3, seed);
        let mut tree = Tree::new(data, labels, SplitCriterion::Gini)?;
        tree.fit_full_tree(&EmpiricalSplitter)?;
        Ok(tree)
    }

    #[test]
    fn test_root_misclass_rate() -> Result<(), Box<dyn Error>> {
        let tree = Tree::from_shape(vec![1., 2., 3., 4.], &[4], vec![0, 1, 1, 1], SplitCriterion::Gini)?;
        assert_eq!(tree.total_misclass_rate(), 0.25);
        assert_eq!(tree.subtree_props(ROOT_ID)?, (0.25, vec![ROOT_ID]));
        Ok(())
    }

    #[test]
    fn test_subtree_of_root_is_whole_tree() -> Result<(), Box<dyn Error>> {
        let tree = grown(3)?;
        let (risk, mut leaves) = tree.subtree_props(ROOT_ID)?;
        leaves.sort();
        assert_eq!(leaves, tree.leaf_inds.iter().copied().collect::<Vec<_>>());
        assert_eq!(precision_round(risk, 12), precision_round(tree.total_misclass_rate(), 12));
        Ok(())
    }

    #[test]
    fn test_subtree_never_riskier_than_its_root() -> Result<(), Box<dyn Error>> {
        let tree = grown(17)?;
        for node in tree.nodes.values() {
            let (risk, leaves) = tree.subtree_props(node.num)?;
            assert!(risk <= node.compute_error_rate() * node.reach_prob + 1e-12);
            if node.is_leaf() {
                assert_eq!(leaves, vec![node.num]);
            } else {
                assert!(leaves.len() >= 2);
                let reach: f64 = leaves.iter().map(|i| tree.nodes[i].reach_prob).sum();
                assert!((reach - node.reach_prob).abs() < 1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn test_descendants() -> Result<(), Box<dyn Error>> {
        let tree = grown(5)?;
        let all = tree.descendants(ROOT_ID)?;
        assert_eq!(all.len(), tree.n_nodes() - 1);
        for leaf in tree.leaf_inds.iter() {
            assert!(tree.descendants(*leaf)?.is_empty());
        }
        Ok(())
    }

    #[test]
    fn test_missing_node() -> Result<(), Box<dyn Error>> {
        let tree = grown(1)?;
        assert_eq!(tree.subtree_props(10_000), Err(CcTreeError::NodeNotFound(10_000)));
        assert_eq!(tree.descendants(10_000), Err(CcTreeError::NodeNotFound(10_000)));
        Ok(())
    }
}
