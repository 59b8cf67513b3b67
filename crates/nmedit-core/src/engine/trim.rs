use super::error::EditError;
use crate::core::models::mask::Mask;
use crate::core::models::model::{Model, ModelKind};
use crate::core::models::selection::{AtomSubset, SelectionResolver};
use nalgebra::{DMatrix, Matrix3};
use tracing::instrument;

/// Restricts a model's matrix to the masked subset of nodes and repairs the
/// diagonal invariant.
///
/// The masked rows and columns of the connectivity/Hessian/covariance matrix
/// are extracted, then, for scalar-node and vector-node models, each diagonal
/// entry (or 3x3 block) is recomputed as the negated sum of the other entries
/// (blocks) in its row so that the reduced matrix is again Laplacian-like
/// over the retained node set. Couplings to removed nodes are dropped, not
/// redistributed. Covariance matrices get a plain submatrix extraction.
///
/// Eigen data is not carried: modes must be recomputed for the new matrix.
/// Vector-node substructure annotations (membrane and combined Hessians) are
/// carried over unchanged.
#[instrument(skip_all)]
pub fn trim_model_by_mask(model: &Model, mask: &Mask) -> Result<Model, EditError> {
    if mask.len() != model.node_count() {
        return Err(EditError::MaskLengthMismatch {
            expected: model.node_count(),
            found: mask.len(),
        });
    }
    let matrix = model.matrix().ok_or_else(|| EditError::MissingData {
        title: model.title().to_string(),
        data: model.kind().matrix_name(),
    })?;

    let rows = mask.repeat(model.dof_per_node()).selected_indices();
    let mut submatrix = matrix.select_rows(rows.iter()).select_columns(rows.iter());

    // Repair runs strictly after extraction; repairing first is not
    // equivalent when self-interaction terms are present.
    match model.kind() {
        ModelKind::ScalarNode => repair_scalar_diagonal(&mut submatrix),
        ModelKind::VectorNode => repair_block_diagonal(&mut submatrix),
        ModelKind::Covariance => {}
    }

    let mut trimmed = model.empty_like(format!("{} trimmed", model.title()));
    trimmed.set_matrix(submatrix)?;

    if let (Model::VectorNode(source), Model::VectorNode(output)) = (model, &mut trimmed) {
        output.set_membrane(source.membrane().cloned());
        output.set_combined(source.combined().cloned());
    }

    Ok(trimmed)
}

/// Selection-taking variant of [`trim_model_by_mask`]; returns the trimmed
/// model together with the resolved atom subset.
pub fn trim_model(
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
    let trimmed = trim_model_by_mask(model, &mask)?;
    Ok((trimmed, subset))
}

/// Sets each diagonal entry to the negated sum of the other entries in its
/// row.
fn repair_scalar_diagonal(matrix: &mut DMatrix<f64>) {
    for i in 0..matrix.nrows() {
        let row_sum: f64 = matrix.row(i).sum();
        let diagonal = matrix[(i, i)];
        matrix[(i, i)] = -(row_sum - diagonal);
    }
}

/// Sets each diagonal 3x3 block to the negated sum of the other blocks in
/// its block-row.
fn repair_block_diagonal(matrix: &mut DMatrix<f64>) {
    let blocks = matrix.nrows() / 3;
    for i in 0..blocks {
        let mut sum = Matrix3::zeros();
        for j in 0..blocks {
            if i == j {
                continue;
            }
            sum -= matrix.fixed_view::<3, 3>(3 * i, 3 * j);
        }
        matrix.fixed_view_mut::<3, 3>(3 * i, 3 * i).copy_from(&sum);
    }
}
