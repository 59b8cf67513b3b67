use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EigenError {
    #[error("eigenvector matrix has {vector_count} columns but {value_count} eigenvalues were given")]
    CountMismatch {
        vector_count: usize,
        value_count: usize,
    },

    #[error("data length {len} is not divisible by 3 for 3D data")]
    LengthNotDivisible { len: usize },
}

/// A set of eigenpairs computed for a model's matrix.
///
/// Column `i` of the vector matrix is the eigenvector belonging to
/// eigenvalue `i`. The set is only required to be consistent with the matrix
/// it was computed from, not with the matrix currently stored on a model;
/// trim and reduce deliberately discard eigen data for this reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenSet {
    vectors: DMatrix<f64>,
    values: DVector<f64>,
}

impl EigenSet {
    /// Creates an eigenpair set.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError::CountMismatch`] if the number of eigenvector
    /// columns differs from the number of eigenvalues.
    pub fn new(vectors: DMatrix<f64>, values: DVector<f64>) -> Result<Self, EigenError> {
        if vectors.ncols() != values.len() {
            return Err(EigenError::CountMismatch {
                vector_count: vectors.ncols(),
                value_count: values.len(),
            });
        }
        Ok(Self { vectors, values })
    }

    /// The number of rows of the eigenvector matrix (the model dimension).
    pub fn dof(&self) -> usize {
        self.vectors.nrows()
    }

    /// The number of stored modes.
    pub fn mode_count(&self) -> usize {
        self.values.len()
    }

    pub fn vectors(&self) -> &DMatrix<f64> {
        &self.vectors
    }

    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        (index < self.values.len()).then(|| self.values[index])
    }
}

/// A bare displacement vector over a set of nodes or atoms.
///
/// Unlike a mode, a displacement carries no eigenvalue, so the engines apply
/// no variance scaling to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    title: String,
    is_3d: bool,
    data: DVector<f64>,
}

impl Displacement {
    /// Creates a displacement vector.
    ///
    /// # Errors
    ///
    /// Returns [`EigenError::LengthNotDivisible`] if `is_3d` is set and the
    /// data length is not a multiple of 3.
    pub fn new(
        title: impl Into<String>,
        data: DVector<f64>,
        is_3d: bool,
    ) -> Result<Self, EigenError> {
        if is_3d && data.len() % 3 != 0 {
            return Err(EigenError::LengthNotDivisible { len: data.len() });
        }
        Ok(Self {
            title: title.into(),
            is_3d,
            data,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_3d(&self) -> bool {
        self.is_3d
    }

    pub fn data(&self) -> &DVector<f64> {
        &self.data
    }

    /// The number of nodes the displacement covers (length / 3 for 3D data).
    pub fn node_count(&self) -> usize {
        if self.is_3d {
            self.data.len() / 3
        } else {
            self.data.len()
        }
    }

    pub fn norm(&self) -> f64 {
        self.data.norm()
    }
}

/// Divides each column by its Euclidean norm. Zero columns are left alone.
pub(crate) fn normalize_columns(vectors: &mut DMatrix<f64>) {
    for mut column in vectors.column_iter_mut() {
        let norm = column.norm();
        if norm > 0.0 {
            column /= norm;
        }
    }
}
