use super::tree::Tree;
use crate::config::TreeConfig;

impl<L, K> Tree<L, K> {
    // Set methods for paramters

    /// Set the whole configuration of the tree.
    /// * `config` - Tolerances used while cleaning and pruning.
    pub fn set_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the tolerance used to detect useless splits.
    /// * `useless_split_tolerance` - Largest gap between a parent's risk and the
    ///   summed risk of its leaf children for the split to be cut.
    pub fn set_useless_split_tolerance(mut self, useless_split_tolerance: f64) -> Self {
        self.config.useless_split_tolerance = useless_split_tolerance;
        self
    }

    /// Set the slack of the subtree risk check done while pruning.
    /// * `risk_tolerance` - How much a subtree's risk may exceed its root's risk
    ///   before pruning aborts.
    pub fn set_risk_tolerance(mut self, risk_tolerance: f64) -> Self {
        self.config.risk_tolerance = risk_tolerance;
        self
    }

    /// Set how a node's own cost is measured while pruning.
    /// * `weighted_link_strength` - Use the node's risk, reach probability times
    ///   error rate, instead of its plain error rate.
    pub fn set_weighted_link_strength(mut self, weighted_link_strength: bool) -> Self {
        self.config.weighted_link_strength = weighted_link_strength;
        self
    }
}
