use super::error::EditError;
use crate::core::models::mask::Mask;
use crate::core::models::model::{Model, ModelKind};
use crate::core::models::selection::{AtomSubset, SelectionResolver};
use nalgebra::DMatrix;
use tracing::{debug, instrument};

/// Singular values at or below this threshold are treated as zero when
/// deciding between the strict inverse and the pseudo-inverse.
const SINGULARITY_EPS: f64 = 1e-10;

/// Reduces a model to the masked subset of nodes by analytically eliminating
/// the others.
///
/// For scalar-node and vector-node models the retained ("system") block is
/// corrected by the Schur complement, `M_ss - M_so * M_oo^-1 * M_os`: the
/// reduced matrix reproduces the equilibrium response of the full system
/// when the eliminated nodes relax to minimize potential energy. When the
/// eliminated set is empty the result is simply `M_ss` and no inversion is
/// attempted. Covariance models instead get the plain system-system
/// submatrix: marginal, not conditional, statistics.
///
/// Eigen data is not carried: modes must be recomputed for the new matrix.
/// No diagonal repair is applied; the Schur complement already has the
/// correct row-sum behavior for the retained subsystem.
#[instrument(skip_all)]
pub fn reduce_model_by_mask(model: &Model, mask: &Mask) -> Result<Model, EditError> {
    if mask.len() != model.node_count() {
        return Err(EditError::MaskLengthMismatch {
            expected: model.node_count(),
            found: mask.len(),
        });
    }
    if mask.selected_count() == 0 {
        return Err(EditError::EmptySelection);
    }
    let matrix = model.matrix().ok_or_else(|| EditError::MissingData {
        title: model.title().to_string(),
        data: model.kind().matrix_name(),
    })?;

    let row_mask = mask.repeat(model.dof_per_node());
    let reduced = match model.kind() {
        ModelKind::Covariance => {
            let rows = row_mask.selected_indices();
            matrix.select_rows(rows.iter()).select_columns(rows.iter())
        }
        ModelKind::ScalarNode | ModelKind::VectorNode => schur_complement(matrix, &row_mask)?,
    };

    let mut output = model.empty_like(format!("{} reduced", model.title()));
    output.set_matrix(reduced)?;
    Ok(output)
}

/// Selection-taking variant of [`reduce_model_by_mask`]; returns the reduced
/// model together with the resolved atom subset.
pub fn reduce_model(
    model: &Model,
    resolver: &dyn SelectionResolver,
    selection: &str,
) -> Result<(Model, AtomSubset), EditError> {
    if resolver.atom_count() != model.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: model.node_count(),
            found: resolver.atom_count(),
        });
    }
    let (mask, subset) = resolver.resolve_mask(selection)?;
    let reduced = reduce_model_by_mask(model, &mask)?;
    Ok((reduced, subset))
}

/// Eliminates the unselected rows/columns of `matrix` via the Schur
/// complement over the selected ("system") block.
fn schur_complement(matrix: &DMatrix<f64>, row_mask: &Mask) -> Result<DMatrix<f64>, EditError> {
    let system = row_mask.selected_indices();
    let other = row_mask.excluded_indices();

    let ss = matrix
        .select_rows(system.iter())
        .select_columns(system.iter());
    if other.is_empty() {
        return Ok(ss);
    }

    let so = matrix
        .select_rows(system.iter())
        .select_columns(other.iter());
    let os = matrix
        .select_rows(other.iter())
        .select_columns(system.iter());
    let oo = matrix
        .select_rows(other.iter())
        .select_columns(other.iter());

    let oo_inverse = invert_coupling_block(oo)?;
    Ok(ss - so * oo_inverse * os)
}

/// Inverts the eliminated-block matrix, falling back to the Moore-Penrose
/// pseudo-inverse when the block is rank-deficient.
///
/// Elastic-network Laplacians are singular by construction (uniform
/// translations cost no energy), so degenerate partitions are expected; the
/// fallback is deterministic and never surfaced as an error.
fn invert_coupling_block(block: DMatrix<f64>) -> Result<DMatrix<f64>, EditError> {
    let dim = block.nrows();
    let svd = block.clone().svd(true, true);
    if svd.rank(SINGULARITY_EPS) == dim {
        if let Some(inverse) = block.try_inverse() {
            return Ok(inverse);
        }
    } else {
        debug!(dim, "eliminated block is rank-deficient, using pseudo-inverse");
    }
    svd.pseudo_inverse(SINGULARITY_EPS)
        .map_err(|reason| EditError::Internal(format!("pseudo-inverse failed: {reason}")))
}
