pub mod analysis;
pub mod predict;
pub mod setters;
pub mod tree;

pub use tree::{load_sequence, save_sequence, GrowthReport, Tree};
