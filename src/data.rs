use crate::errors::CcTreeError;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for class labels.
///
/// Anything totally ordered and cloneable can label a sample, the tree
/// keeps its symbols sorted and compares labels for purity.
pub trait Label: Clone + Ord + Debug {}

impl<T> Label for T where T: Clone + Ord + Debug {}

/// Feature-major matrix that owns its data.
///
/// Rows are feature dimensions and columns are samples, so a whole
/// feature is a contiguous slice.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Matrix {
    /// The contents of the matrix, one feature after the other.
    pub data: Vec<f64>,
    /// Number of features.
    pub rows: usize,
    /// Number of samples.
    pub cols: usize,
}

impl Matrix {
    /// Create a new Matrix.
    ///
    /// * `data` - Values laid out feature by feature.
    /// * `rows` - Number of features.
    /// * `cols` - Number of samples.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols);
        Matrix { data, rows, cols }
    }

    /// Single feature over `values.len()` samples.
    pub fn from_vec(values: Vec<f64>) -> Self {
        let cols = values.len();
        Matrix::new(values, 1, cols)
    }

    /// Build a matrix from an n-dimensional shape.
    ///
    /// A 1-D shape `[n]` is one feature over `n` samples, a 2-D shape
    /// `[features, samples]` is taken as is. Anything else is rejected.
    pub fn from_shape(values: Vec<f64>, shape: &[usize]) -> Result<Self, CcTreeError> {
        let (rows, cols) = match shape {
            [n] => (1, *n),
            [r, c] => (*r, *c),
            _ => return Err(CcTreeError::Dimensionality(shape.len())),
        };
        if rows * cols != values.len() {
            return Err(CcTreeError::InvalidParameter(
                "shape".to_string(),
                format!("{} values", rows * cols),
                values.len().to_string(),
            ));
        }
        Ok(Matrix::new(values, rows, cols))
    }

    /// Build a matrix from one vector per feature.
    pub fn from_features(features: &[Vec<f64>]) -> Result<Self, CcTreeError> {
        let cols = features.first().map_or(0, |f| f.len());
        if let Some(f) = features.iter().find(|f| f.len() != cols) {
            return Err(CcTreeError::InvalidParameter(
                "features".to_string(),
                format!("{} samples per feature", cols),
                f.len().to_string(),
            ));
        }
        let data = features.iter().flatten().copied().collect();
        Ok(Matrix::new(data, features.len(), cols))
    }

    /// Number of feature dimensions.
    pub fn n_features(&self) -> usize {
        self.rows
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.cols
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The feature.
    /// * `j` - The sample.
    pub fn get(&self, i: usize, j: usize) -> &f64 {
        &self.data[self.item_index(i, j)]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// All values of one feature.
    pub fn get_row(&self, feature: usize) -> &[f64] {
        let start = self.item_index(feature, 0);
        &self.data[start..start + self.cols]
    }

    /// All feature values of one sample.
    pub fn get_col(&self, sample: usize) -> Vec<f64> {
        (0..self.rows).map(|i| *self.get(i, sample)).collect()
    }

    /// New matrix keeping only the given samples, in the given order.
    pub fn select_cols(&self, samples: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(self.rows * samples.len());
        for i in 0..self.rows {
            let row = self.get_row(i);
            data.extend(samples.iter().map(|j| row[*j]));
        }
        Matrix::new(data, self.rows, samples.len())
    }

    /// Minimum and maximum of a feature, `None` without samples.
    pub fn row_bounds(&self, feature: usize) -> Option<(f64, f64)> {
        self.get_row(feature).iter().fold(None, |acc, v| match acc {
            None => Some((*v, *v)),
            Some((lo, hi)) => Some((lo.min(*v), hi.max(*v))),
        })
    }
}
