use super::mask::Mask;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("selection '{selection}' could not be resolved: {reason}")]
    Unresolvable { selection: String, reason: String },
}

/// A handle identifying which atoms a sliced/trimmed/reduced result
/// corresponds to, returned alongside the result for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomSubset {
    /// The selection expression (or other label) that produced the subset.
    pub label: String,
    /// Indices of the selected atoms, in ascending order.
    pub indices: Vec<usize>,
}

/// The injected atom-selection collaborator.
///
/// Parsing and evaluating selection expressions is out of scope for this
/// crate; the engines only require that a resolver can turn an expression
/// into a node [`Mask`] plus the matching [`AtomSubset`] handle. Implementors
/// wrap whatever atom container and selection language the caller uses.
pub trait SelectionResolver {
    /// The number of atoms the resolver covers; must equal the node count of
    /// the model being edited.
    fn atom_count(&self) -> usize;

    /// Resolves a selection expression into a boolean node mask and the
    /// subset handle describing the selected atoms.
    fn resolve_mask(&self, selection: &str) -> Result<(Mask, AtomSubset), SelectionError>;
}
