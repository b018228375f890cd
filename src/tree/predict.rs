use super::tree::Tree;
use crate::constants::ROOT_ID;
use crate::data::{Label, Matrix};
use crate::node::NodeId;
use crate::utils::argmax;

impl<L: Label, K> Tree<L, K> {
    /// Id of the leaf a sample lands in.
    ///
    /// Values at or below a node's threshold go left.
    pub fn apply_row(&self, row: &[f64]) -> NodeId {
        assert_eq!(row.len(), self.n_features());
        let mut node_idx = ROOT_ID;
        loop {
            let node = &self.nodes[&node_idx];
            match (node.split, node.children()) {
                (Some(split), Some((left, right))) => {
                    node_idx = if row[split.feature] <= split.threshold { left } else { right };
                }
                _ => return node_idx,
            }
        }
    }

    /// Class posterior of the leaf a sample lands in, ordered like `symbols`.
    pub fn predict_proba_row(&self, row: &[f64]) -> &[f64] {
        &self.nodes[&self.apply_row(row)].class_prob
    }

    /// Majority class of the leaf a sample lands in.
    pub fn predict_row(&self, row: &[f64]) -> &L {
        &self.symbols[argmax(self.predict_proba_row(row))]
    }

    /// Predict every sample (column) of a feature major matrix.
    pub fn predict(&self, data: &Matrix) -> Vec<L> {
        (0..data.n_samples())
            .map(|j| self.predict_row(&data.get_col(j)).clone())
            .collect()
    }

    /// Posterior of every sample of a feature major matrix.
    pub fn predict_proba(&self, data: &Matrix) -> Vec<Vec<f64>> {
        (0..data.n_samples())
            .map(|j| self.predict_proba_row(&data.get_col(j)).to_vec())
            .collect()
    }

    /// Share of samples whose prediction differs from the label.
    pub fn misclassification_error(&self, data: &Matrix, labels: &[L]) -> f64 {
        if labels.is_empty() {
            return 0.0;
        }
        let wrong = self
            .predict(data)
            .iter()
            .zip(labels)
            .filter(|(p, y)| p != y)
            .count();
        wrong as f64 / labels.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::ROOT_ID;
    use crate::data::Matrix;
    use crate::splitter::{EmpiricalSplitter, SplitCriterion};
    use crate::tree::test_utils::random_dataset;
    use crate::tree::Tree;
    use std::error::Error;

    #[test]
    fn test_predict_separable() -> Result<(), Box<dyn Error>> {
        let mut tree = Tree::from_shape(
            vec![1., 2., 3., 10., 11., 12.],
            &[6],
            vec!["low", "low", "low", "high", "high", "high"],
            SplitCriterion::Gini,
        )?;
        tree.fit_full_tree(&EmpiricalSplitter)?;
        assert_eq!(tree.predict_row(&[0.0]), &"low");
        assert_eq!(tree.predict_row(&[6.5]), &"low");
        assert_eq!(tree.predict_row(&[6.6]), &"high");
        assert_eq!(tree.predict_proba_row(&[20.0]), &[1.0, 0.0]);
        assert_eq!(tree.symbols, vec!["high", "low"]);
        Ok(())
    }

    #[test]
    fn test_root_only_predicts_majority() -> Result<(), Box<dyn Error>> {
        let tree = Tree::from_shape(vec![1., 2., 3.], &[3], vec![4, 7, 7], SplitCriterion::Gini)?;
        assert_eq!(tree.apply_row(&[100.]), ROOT_ID);
        assert_eq!(tree.predict_row(&[0.]), &7);
        Ok(())
    }

    #[test]
    fn test_full_tree_fits_training_data() -> Result<(), Box<dyn Error>> {
        let (data, labels) = random_dataset(3, 150, 4, 21);
        let mut tree = Tree::new(data.clone(), labels.clone(), SplitCriterion::Gini)?;
        tree.fit_full_tree(&EmpiricalSplitter)?;
        assert_eq!(tree.predict(&data), labels);
        assert_eq!(tree.misclassification_error(&data, &labels), 0.0);
        let proba = tree.predict_proba(&data);
        assert_eq!(proba.len(), labels.len());
        assert!(proba.iter().all(|p| p.len() == tree.symbols.len()));
        Ok(())
    }

    #[test]
    fn test_misclassification_error() -> Result<(), Box<dyn Error>> {
        let tree = Tree::from_shape(vec![1., 2.], &[2], vec![0, 0], SplitCriterion::Gini)?;
        let data = Matrix::from_vec(vec![1., 2., 3., 4.]);
        assert_eq!(tree.misclassification_error(&data, &[0, 1, 1, 0]), 0.5);
        assert_eq!(tree.misclassification_error(&Matrix::from_vec(vec![]), &[]), 0.0);
        Ok(())
    }
}
