use super::error::EditError;
use crate::core::models::eigen::{Displacement, normalize_columns};
use crate::core::models::mapping::AtomMapping;
use crate::core::models::model::{Mode, Model};
use tracing::instrument;

/// Extends a coarse-grained model built for nodes to a finer atom set.
///
/// Every fine atom inherits the eigenvector entries of the coarse node it
/// maps to; eigenvalues pass through unchanged. The output carries modes
/// only, no matrix. If `norm` is set, each extended eigenvector column is
/// divided by its Euclidean norm over the expanded axis.
#[instrument(skip_all)]
pub fn extend_model(
    model: &Model,
    mapping: &AtomMapping,
    norm: bool,
) -> Result<Model, EditError> {
    if mapping.node_count() != model.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: model.node_count(),
            found: mapping.node_count(),
        });
    }
    let eigen = model.eigen().ok_or_else(|| EditError::MissingData {
        title: model.title().to_string(),
        data: "eigen data",
    })?;

    let rows = mapping.row_indices(model.is_3d());
    let mut vectors = eigen.vectors().select_rows(rows.iter());
    if norm {
        normalize_columns(&mut vectors);
    }

    let mut extended = model.empty_like(format!("Extended {}", model.title()));
    extended.set_eigens(vectors, eigen.values().clone())?;
    Ok(extended)
}

/// Extends a single mode to a finer atom set.
///
/// The extended vector is multiplied by the square root of the mode's
/// variance, so it carries amplitude rather than a unit direction. If `norm`
/// is set the vector is unit-normalized instead; the two policies are
/// mutually exclusive.
pub fn extend_mode(
    mode: &Mode<'_>,
    mapping: &AtomMapping,
    norm: bool,
) -> Result<Displacement, EditError> {
    if mapping.node_count() != mode.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: mode.node_count(),
            found: mapping.node_count(),
        });
    }

    let rows = mapping.row_indices(mode.is_3d());
    let mut data = mode.vector().select_rows(rows.iter());
    if norm {
        let length = data.norm();
        if length > 0.0 {
            data /= length;
        }
    } else {
        data *= mode.variance().sqrt();
    }

    Ok(Displacement::new(
        format!("Extended {}", mode.label()),
        data,
        mode.is_3d(),
    )?)
}

/// Extends a bare displacement vector to a finer atom set.
///
/// Pure row replication: vectors carry no eigenvalue, so no variance scaling
/// is applied.
pub fn extend_vector(
    vector: &Displacement,
    mapping: &AtomMapping,
) -> Result<Displacement, EditError> {
    if mapping.node_count() != vector.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: vector.node_count(),
            found: mapping.node_count(),
        });
    }

    let rows = mapping.row_indices(vector.is_3d());
    let data = vector.data().select_rows(rows.iter());
    Ok(Displacement::new(
        format!("Extended {}", vector.title()),
        data,
        vector.is_3d(),
    )?)
}
