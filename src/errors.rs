//! Errors
//!
//! Custom error types used throughout the `cctree` crate.
use crate::node::NodeId;
use thiserror::Error;

/// Errors that can occur while building, analysing or pruning a tree.
#[derive(Debug, Error, PartialEq)]
pub enum CcTreeError {
    /// Feature data with an unsupported number of dimensions.
    #[error("Dimension of the input data should not be higher than 2, {0} provided.")]
    Dimensionality(usize),
    /// First value is the number of samples in the data, second the number of labels.
    #[error("Data has {0} samples, but {1} labels were provided.")]
    ShapeMismatch(usize, usize),
    /// No samples at all.
    #[error("Cannot build a tree from an empty dataset.")]
    EmptyData,
    /// Lookup of an identifier that is not part of the tree.
    #[error("Node {0} is not a node of the tree.")]
    NodeNotFound(NodeId),
    /// The risk of a subtree came out larger than the cost of its root alone,
    /// its error rate or, with weighted link strengths, its risk.
    #[error("Risk {subtree_risk} of the subtree rooted at node {node} exceeds the node's own {node_risk}.")]
    SubtreeRiskExceedsNode {
        node: NodeId,
        subtree_risk: f64,
        node_risk: f64,
    },
    /// An internal node whose subtree has fewer than two leaves.
    #[error("Internal node {node} has a subtree with {n_leaves} leaves, at least 2 expected.")]
    DegenerateSubtree { node: NodeId, n_leaves: usize },
    /// The split collaborator returned something unusable.
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to write a tree to a file or string.
    #[error("Unable to write tree: {0}")]
    UnableToWrite(String),
    /// Unable to read a tree from a file or string.
    #[error("Unable to read tree: {0}")]
    UnableToRead(String),
}
