// Modules
pub mod config;
pub mod constants;
pub mod data;
pub mod errors;
pub mod node;
pub mod prune;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use config::TreeConfig;
pub use data::{Label, Matrix};
pub use errors::CcTreeError;
pub use node::{Node, NodeId};
pub use prune::{CutReport, PruneStep, RemoveOutcome};
pub use splitter::{BranchProbabilities, EmpiricalSplitter, SplitCriterion, Splitter};
pub use tree::{load_sequence, save_sequence, GrowthReport, Tree};
