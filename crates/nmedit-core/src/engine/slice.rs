use super::error::EditError;
use crate::core::models::eigen::{Displacement, normalize_columns};
use crate::core::models::mask::Mask;
use crate::core::models::model::{Mode, Model};
use crate::core::models::selection::{AtomSubset, SelectionResolver};
use tracing::instrument;

/// Restricts a model's eigenvector data to the masked subset of nodes.
///
/// Only the mode data is sliced; the connectivity matrix is irrelevant to
/// the output and not carried. Eigenvalues pass through unchanged. If `norm`
/// is set, each sliced eigenvector column is divided by its post-slice
/// Euclidean norm.
#[instrument(skip_all)]
pub fn slice_model_by_mask(model: &Model, mask: &Mask, norm: bool) -> Result<Model, EditError> {
    if mask.len() != model.node_count() {
        return Err(EditError::MaskLengthMismatch {
            expected: model.node_count(),
            found: mask.len(),
        });
    }
    let eigen = model.eigen().ok_or_else(|| EditError::MissingData {
        title: model.title().to_string(),
        data: "eigen data",
    })?;

    let rows = mask.repeat(model.dof_per_node()).selected_indices();
    let mut vectors = eigen.vectors().select_rows(rows.iter());
    if norm {
        normalize_columns(&mut vectors);
    }

    let mut sliced = model.empty_like(format!("{} sliced", model.title()));
    sliced.set_eigens(vectors, eigen.values().clone())?;
    Ok(sliced)
}

/// Restricts a single mode to the masked subset of nodes.
///
/// The sliced vector is multiplied by the square root of the mode's
/// variance: it carries amplitude, not a pure unit direction.
pub fn slice_mode_by_mask(mode: &Mode<'_>, mask: &Mask) -> Result<Displacement, EditError> {
    if mask.len() != mode.node_count() {
        return Err(EditError::MaskLengthMismatch {
            expected: mode.node_count(),
            found: mask.len(),
        });
    }

    let factor = if mode.is_3d() { 3 } else { 1 };
    let rows = mask.repeat(factor).selected_indices();
    let data = mode.vector().select_rows(rows.iter()) * mode.variance().sqrt();

    Ok(Displacement::new(
        format!("{} sliced", mode.label()),
        data,
        mode.is_3d(),
    )?)
}

/// Restricts a bare displacement vector to the masked subset of nodes.
/// No scaling is applied and the result is not normalized.
pub fn slice_vector_by_mask(
    vector: &Displacement,
    mask: &Mask,
) -> Result<Displacement, EditError> {
    if mask.len() != vector.node_count() {
        return Err(EditError::MaskLengthMismatch {
            expected: vector.node_count(),
            found: mask.len(),
        });
    }

    let factor = if vector.is_3d() { 3 } else { 1 };
    let rows = mask.repeat(factor).selected_indices();
    let data = vector.data().select_rows(rows.iter());

    Ok(Displacement::new(
        format!("{} sliced", vector.title()),
        data,
        vector.is_3d(),
    )?)
}

/// Selection-taking variant of [`slice_model_by_mask`]; returns the sliced
/// model together with the resolved atom subset.
pub fn slice_model(
    model: &Model,
    resolver: &dyn SelectionResolver,
    selection: &str,
    norm: bool,
) -> Result<(Model, AtomSubset), EditError> {
    if resolver.atom_count() != model.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: model.node_count(),
            found: resolver.atom_count(),
        });
    }
    let (mask, subset) = resolver.resolve_mask(selection)?;
    let sliced = slice_model_by_mask(model, &mask, norm)?;
    Ok((sliced, subset))
}

/// Selection-taking variant of [`slice_mode_by_mask`].
pub fn slice_mode(
    mode: &Mode<'_>,
    resolver: &dyn SelectionResolver,
    selection: &str,
) -> Result<(Displacement, AtomSubset), EditError> {
    if resolver.atom_count() != mode.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: mode.node_count(),
            found: resolver.atom_count(),
        });
    }
    let (mask, subset) = resolver.resolve_mask(selection)?;
    let sliced = slice_mode_by_mask(mode, &mask)?;
    Ok((sliced, subset))
}

/// Selection-taking variant of [`slice_vector_by_mask`].
pub fn slice_vector(
    vector: &Displacement,
    resolver: &dyn SelectionResolver,
    selection: &str,
) -> Result<(Displacement, AtomSubset), EditError> {
    if resolver.atom_count() != vector.node_count() {
        return Err(EditError::AtomCountMismatch {
            model_nodes: vector.node_count(),
            found: resolver.atom_count(),
        });
    }
    let (mask, subset) = resolver.resolve_mask(selection)?;
    let sliced = slice_vector_by_mask(vector, &mask)?;
    Ok((sliced, subset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::selection::SelectionError;
    use nalgebra::{DMatrix, DVector};

    const TOLERANCE: f64 = 1e-10;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn scalar_model_with_modes() -> Model {
        let mut model = Model::scalar_node("test gnm");
        model
            .set_eigens(
                DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
                DVector::from_vec(vec![2.0, 8.0]),
            )
            .unwrap();
        model
    }

    fn vector_model_with_modes() -> Model {
        let mut model = Model::vector_node("test anm");
        let vectors = DMatrix::from_row_slice(6, 1, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        model
            .set_eigens(vectors, DVector::from_vec(vec![4.0]))
            .unwrap();
        model
    }

    struct FixedResolver {
        atoms: usize,
        indices: Vec<usize>,
    }

    impl SelectionResolver for FixedResolver {
        fn atom_count(&self) -> usize {
            self.atoms
        }

        fn resolve_mask(&self, selection: &str) -> Result<(Mask, AtomSubset), SelectionError> {
            let mask = Mask::from_indices(&self.indices, self.atoms).map_err(|e| {
                SelectionError::Unresolvable {
                    selection: selection.to_string(),
                    reason: e.to_string(),
                }
            })?;
            Ok((
                mask,
                AtomSubset {
                    label: selection.to_string(),
                    indices: self.indices.clone(),
                },
            ))
        }
    }

    #[test]
    fn slice_model_keeps_selected_rows_and_all_eigenvalues() {
        let model = scalar_model_with_modes();
        let mask = Mask::from_bools(vec![true, false, true]);

        let sliced = slice_model_by_mask(&model, &mask, false).unwrap();

        assert_eq!(sliced.node_count(), 2);
        assert!(sliced.matrix().is_none());
        let expected = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 5.0, 6.0]);
        assert_eq!(sliced.eigen().unwrap().vectors(), &expected);
        assert_eq!(
            sliced.eigen().unwrap().values(),
            &DVector::from_vec(vec![2.0, 8.0])
        );
    }

    #[test]
    fn slice_model_3d_expands_mask_per_coordinate() {
        let model = vector_model_with_modes();
        let mask = Mask::from_bools(vec![false, true]);

        let sliced = slice_model_by_mask(&model, &mask, false).unwrap();

        assert_eq!(sliced.node_count(), 1);
        let expected = DMatrix::from_row_slice(3, 1, &[4.0, 5.0, 6.0]);
        assert_eq!(sliced.eigen().unwrap().vectors(), &expected);
    }

    #[test]
    fn slice_model_norm_yields_unit_columns() {
        let model = scalar_model_with_modes();
        let mask = Mask::from_bools(vec![true, true, false]);

        let sliced = slice_model_by_mask(&model, &mask, true).unwrap();

        for column in sliced.eigen().unwrap().vectors().column_iter() {
            assert!(f64_approx_equal(column.norm(), 1.0));
        }
    }

    #[test]
    fn boolean_and_index_masks_slice_identically() {
        let model = scalar_model_with_modes();
        let boolean = Mask::from_bools(vec![true, false, true]);
        let indices = Mask::from_indices(&[0, 2], 3).unwrap();

        let from_bools = slice_model_by_mask(&model, &boolean, false).unwrap();
        let from_indices = slice_model_by_mask(&model, &indices, false).unwrap();
        assert_eq!(from_bools, from_indices);
    }

    #[test]
    fn slice_model_rejects_mask_length_mismatch() {
        let model = scalar_model_with_modes();
        let mask = Mask::from_bools(vec![true, false]);

        let result = slice_model_by_mask(&model, &mask, false);
        assert!(matches!(
            result,
            Err(EditError::MaskLengthMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn slice_model_requires_eigen_data() {
        let mut model = Model::scalar_node("matrix only");
        model
            .set_matrix(DMatrix::from_row_slice(2, 2, &[1.0, -1.0, -1.0, 1.0]))
            .unwrap();
        let mask = Mask::from_bools(vec![true, false]);

        let result = slice_model_by_mask(&model, &mask, false);
        assert!(matches!(
            result,
            Err(EditError::MissingData { data: "eigen data", .. })
        ));
    }

    #[test]
    fn slice_mode_scales_by_sqrt_variance() {
        let model = scalar_model_with_modes();
        let mode = model.mode(1).unwrap();
        let mask = Mask::from_bools(vec![true, false, true]);

        let sliced = slice_mode_by_mask(&mode, &mask).unwrap();

        // Eigenvalue 8.0 on an elastic model: variance 1/8.
        let scale = (1.0f64 / 8.0).sqrt();
        let expected = [2.0 * scale, 6.0 * scale];
        for (value, expected) in sliced.data().iter().zip(expected) {
            assert!(f64_approx_equal(*value, expected));
        }
    }

    #[test]
    fn slice_vector_applies_no_scaling() {
        let vector = Displacement::new(
            "motion",
            DVector::from_vec(vec![1.0, 2.0, 3.0]),
            false,
        )
        .unwrap();
        let mask = Mask::from_bools(vec![false, true, true]);

        let sliced = slice_vector_by_mask(&vector, &mask).unwrap();
        assert_eq!(sliced.data(), &DVector::from_vec(vec![2.0, 3.0]));
    }

    #[test]
    fn slice_model_with_resolver_returns_subset_handle() {
        let model = scalar_model_with_modes();
        let resolver = FixedResolver {
            atoms: 3,
            indices: vec![0, 2],
        };

        let (sliced, subset) = slice_model(&model, &resolver, "name CA", false).unwrap();

        assert_eq!(sliced.node_count(), 2);
        assert_eq!(subset.label, "name CA");
        assert_eq!(subset.indices, vec![0, 2]);
    }

    #[test]
    fn slice_model_with_resolver_rejects_atom_count_mismatch() {
        let model = scalar_model_with_modes();
        let resolver = FixedResolver {
            atoms: 4,
            indices: vec![0],
        };

        let result = slice_model(&model, &resolver, "name CA", false);
        assert!(matches!(result, Err(EditError::AtomCountMismatch { .. })));
    }

    #[test]
    fn slice_mode_with_resolver_matches_by_mask_result() {
        let model = vector_model_with_modes();
        let mode = model.mode(0).unwrap();
        let resolver = FixedResolver {
            atoms: 2,
            indices: vec![1],
        };

        let (sliced, _) = slice_mode(&mode, &resolver, "resid 2").unwrap();
        let mask = Mask::from_indices(&[1], 2).unwrap();
        let by_mask = slice_mode_by_mask(&mode, &mask).unwrap();
        assert_eq!(sliced.data(), by_mask.data());
    }

    #[test]
    fn slice_vector_with_resolver_matches_by_mask_result() {
        let vector = Displacement::new(
            "motion",
            DVector::from_vec(vec![1.0, 2.0, 3.0]),
            false,
        )
        .unwrap();
        let resolver = FixedResolver {
            atoms: 3,
            indices: vec![1, 2],
        };

        let (sliced, subset) = slice_vector(&vector, &resolver, "resid 2 3").unwrap();
        assert_eq!(sliced.data(), &DVector::from_vec(vec![2.0, 3.0]));
        assert_eq!(subset.indices, vec![1, 2]);
    }
}
