use super::eigen::{EigenError, EigenSet};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ModelError {
    #[error("matrix must be square, got {rows}x{cols}")]
    MatrixNotSquare { rows: usize, cols: usize },

    #[error("matrix dimension {dim} is not divisible by 3 for a vector-node model")]
    MatrixDimNotDivisible { dim: usize },

    #[error("eigenvector rows {found} do not match the model dimension {expected}")]
    EigenDofMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Eigen(#[from] EigenError),
}

/// The three structurally distinct matrix semantics a model can carry.
///
/// Scalar-node and vector-node matrices are Laplacian-like: each diagonal
/// entry (scalar, or 3x3 block) equals the negated sum of the off-diagonal
/// entries (scalars, or blocks) of its row. Covariance matrices carry no
/// such invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// One degree of freedom per node; N x N connectivity (Kirchhoff) matrix.
    ScalarNode,
    /// Three degrees of freedom per node; 3N x 3N block Hessian.
    VectorNode,
    /// Unconstrained symmetric covariance matrix; no diagonal invariant.
    Covariance,
}

impl ModelKind {
    /// Human-readable name of the matrix this kind of model carries.
    pub fn matrix_name(&self) -> &'static str {
        match self {
            ModelKind::ScalarNode => "Kirchhoff matrix",
            ModelKind::VectorNode => "Hessian matrix",
            ModelKind::Covariance => "covariance matrix",
        }
    }
}

/// A model with one degree of freedom per node, driven by an N x N
/// Laplacian-like connectivity (Kirchhoff) matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarNodeModel {
    title: String,
    nodes: usize,
    kirchhoff: Option<DMatrix<f64>>,
    eigen: Option<EigenSet>,
}

impl ScalarNodeModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: 0,
            kirchhoff: None,
            eigen: None,
        }
    }

    pub fn kirchhoff(&self) -> Option<&DMatrix<f64>> {
        self.kirchhoff.as_ref()
    }
}

/// A model with three degrees of freedom per node, driven by a 3N x 3N block
/// Hessian. May carry auxiliary substructure annotations (an embedded-region
/// Hessian and the combined system-plus-region Hessian) which trim preserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorNodeModel {
    title: String,
    nodes: usize,
    hessian: Option<DMatrix<f64>>,
    eigen: Option<EigenSet>,
    membrane: Option<DMatrix<f64>>,
    combined: Option<DMatrix<f64>>,
}

impl VectorNodeModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: 0,
            hessian: None,
            eigen: None,
            membrane: None,
            combined: None,
        }
    }

    pub fn hessian(&self) -> Option<&DMatrix<f64>> {
        self.hessian.as_ref()
    }

    pub fn membrane(&self) -> Option<&DMatrix<f64>> {
        self.membrane.as_ref()
    }

    pub fn set_membrane(&mut self, membrane: Option<DMatrix<f64>>) {
        self.membrane = membrane;
    }

    pub fn combined(&self) -> Option<&DMatrix<f64>> {
        self.combined.as_ref()
    }

    pub fn set_combined(&mut self, combined: Option<DMatrix<f64>>) {
        self.combined = combined;
    }
}

/// A model driven by an empirical covariance matrix rather than a
/// physics-derived connectivity matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CovarianceModel {
    title: String,
    nodes: usize,
    covariance: Option<DMatrix<f64>>,
    eigen: Option<EigenSet>,
}

impl CovarianceModel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: 0,
            covariance: None,
            eigen: None,
        }
    }

    pub fn covariance(&self) -> Option<&DMatrix<f64>> {
        self.covariance.as_ref()
    }
}

/// A coarse-grained structural-dynamics model.
///
/// The variant determines which matrix semantics apply: which accessor backs
/// [`Model::matrix`], whether the trim engine repairs a diagonal invariant,
/// and whether the reduce engine applies the Schur complement or a plain
/// submatrix extraction.
///
/// Models are immutable inputs to every engine; each engine returns a brand
/// new instance and never touches its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Model {
    ScalarNode(ScalarNodeModel),
    VectorNode(VectorNodeModel),
    Covariance(CovarianceModel),
}

impl Model {
    /// Creates an empty scalar-node model.
    pub fn scalar_node(title: impl Into<String>) -> Self {
        Model::ScalarNode(ScalarNodeModel::new(title))
    }

    /// Creates an empty vector-node model.
    pub fn vector_node(title: impl Into<String>) -> Self {
        Model::VectorNode(VectorNodeModel::new(title))
    }

    /// Creates an empty covariance model.
    pub fn covariance(title: impl Into<String>) -> Self {
        Model::Covariance(CovarianceModel::new(title))
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            Model::ScalarNode(_) => ModelKind::ScalarNode,
            Model::VectorNode(_) => ModelKind::VectorNode,
            Model::Covariance(_) => ModelKind::Covariance,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Model::ScalarNode(m) => &m.title,
            Model::VectorNode(m) => &m.title,
            Model::Covariance(m) => &m.title,
        }
    }

    /// The number of coarse-grained nodes the model was built for.
    pub fn node_count(&self) -> usize {
        match self {
            Model::ScalarNode(m) => m.nodes,
            Model::VectorNode(m) => m.nodes,
            Model::Covariance(m) => m.nodes,
        }
    }

    /// Whether each node carries three degrees of freedom.
    pub fn is_3d(&self) -> bool {
        matches!(self, Model::VectorNode(_))
    }

    /// Degrees of freedom per node: 3 for vector-node models, 1 otherwise.
    pub fn dof_per_node(&self) -> usize {
        if self.is_3d() { 3 } else { 1 }
    }

    /// The dimension of the model's matrix and eigenvectors.
    pub fn dof(&self) -> usize {
        self.node_count() * self.dof_per_node()
    }

    /// The connectivity/Hessian/covariance matrix, if built.
    pub fn matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            Model::ScalarNode(m) => m.kirchhoff.as_ref(),
            Model::VectorNode(m) => m.hessian.as_ref(),
            Model::Covariance(m) => m.covariance.as_ref(),
        }
    }

    /// Installs a new matrix, deriving the node count from its dimension.
    ///
    /// Any stored eigen data is cleared: it belonged to the previous matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MatrixNotSquare`] for a non-square matrix, and
    /// [`ModelError::MatrixDimNotDivisible`] for a vector-node matrix whose
    /// dimension is not a multiple of 3.
    pub fn set_matrix(&mut self, matrix: DMatrix<f64>) -> Result<(), ModelError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(ModelError::MatrixNotSquare {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        let dim = matrix.nrows();
        if self.is_3d() && dim % 3 != 0 {
            return Err(ModelError::MatrixDimNotDivisible { dim });
        }
        let nodes = dim / self.dof_per_node();
        match self {
            Model::ScalarNode(m) => {
                m.kirchhoff = Some(matrix);
                m.nodes = nodes;
                m.eigen = None;
            }
            Model::VectorNode(m) => {
                m.hessian = Some(matrix);
                m.nodes = nodes;
                m.eigen = None;
            }
            Model::Covariance(m) => {
                m.covariance = Some(matrix);
                m.nodes = nodes;
                m.eigen = None;
            }
        }
        Ok(())
    }

    pub fn eigen(&self) -> Option<&EigenSet> {
        match self {
            Model::ScalarNode(m) => m.eigen.as_ref(),
            Model::VectorNode(m) => m.eigen.as_ref(),
            Model::Covariance(m) => m.eigen.as_ref(),
        }
    }

    /// Installs eigen data computed for the model's matrix.
    ///
    /// When a matrix is present, the eigenvector row count must match its
    /// dimension. When no matrix is present (extended or sliced models carry
    /// modes only), the node count is derived from the row count instead.
    pub fn set_eigens(
        &mut self,
        vectors: DMatrix<f64>,
        values: DVector<f64>,
    ) -> Result<(), ModelError> {
        let eigen = EigenSet::new(vectors, values)?;
        let dof = eigen.dof();
        if self.is_3d() && dof % 3 != 0 {
            return Err(ModelError::Eigen(EigenError::LengthNotDivisible {
                len: dof,
            }));
        }
        if let Some(matrix) = self.matrix() {
            if matrix.nrows() != dof {
                return Err(ModelError::EigenDofMismatch {
                    expected: matrix.nrows(),
                    found: dof,
                });
            }
        }
        let nodes = dof / self.dof_per_node();
        match self {
            Model::ScalarNode(m) => {
                m.nodes = nodes;
                m.eigen = Some(eigen);
            }
            Model::VectorNode(m) => {
                m.nodes = nodes;
                m.eigen = Some(eigen);
            }
            Model::Covariance(m) => {
                m.nodes = nodes;
                m.eigen = Some(eigen);
            }
        }
        Ok(())
    }

    /// A borrow view of mode `index`, or `None` if the model has no eigen
    /// data or the index is out of range.
    pub fn mode(&self, index: usize) -> Option<Mode<'_>> {
        let eigen = self.eigen()?;
        (index < eigen.mode_count()).then_some(Mode {
            eigen,
            index,
            kind: self.kind(),
            model_title: self.title(),
        })
    }

    /// Creates an empty model of the same variant, used by the engines to
    /// build their outputs. Auxiliary annotations are not copied.
    pub fn empty_like(&self, title: impl Into<String>) -> Model {
        match self {
            Model::ScalarNode(_) => Model::scalar_node(title),
            Model::VectorNode(_) => Model::vector_node(title),
            Model::Covariance(_) => Model::covariance(title),
        }
    }
}

/// One eigenvector of a model together with its eigenvalue, interpreted as a
/// collective motion and its stiffness (elastic-network models) or variance
/// (covariance models).
#[derive(Debug, Clone, Copy)]
pub struct Mode<'a> {
    eigen: &'a EigenSet,
    index: usize,
    kind: ModelKind,
    model_title: &'a str,
}

impl<'a> Mode<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_3d(&self) -> bool {
        self.kind == ModelKind::VectorNode
    }

    pub fn node_count(&self) -> usize {
        if self.is_3d() {
            self.eigen.dof() / 3
        } else {
            self.eigen.dof()
        }
    }

    /// An owned copy of the eigenvector.
    pub fn vector(&self) -> DVector<f64> {
        self.eigen.vectors().column(self.index).clone_owned()
    }

    pub fn eigenvalue(&self) -> f64 {
        self.eigen.values()[self.index]
    }

    /// The variance along the mode: the eigenvalue itself for covariance
    /// models, its inverse for elastic-network models.
    pub fn variance(&self) -> f64 {
        match self.kind {
            ModelKind::Covariance => self.eigenvalue(),
            ModelKind::ScalarNode | ModelKind::VectorNode => 1.0 / self.eigenvalue(),
        }
    }

    pub fn label(&self) -> String {
        format!("mode {} of {}", self.index, self.model_title)
    }
}
