use crate::node::NodeId;

/// Identifier of the root node, fixed for the lifetime of a tree.
pub const ROOT_ID: NodeId = 0;
/// Default tolerance when checking whether a split gained nothing.
pub const USELESS_SPLIT_TOLERANCE: f64 = 1e-12;
/// Default slack allowed when checking that a subtree is never riskier than its root.
pub const RISK_TOLERANCE: f64 = 1e-12;
/// Tolerance for probability vectors summing to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;
