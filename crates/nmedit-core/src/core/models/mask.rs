use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MaskError {
    #[error("mask index {index} out of range for {nodes} nodes")]
    IndexOutOfRange { index: usize, nodes: usize },
}

/// A set of selected node indices over a model.
///
/// Masks are accepted in two forms, a boolean vector (selected = `true`) or
/// an integer index list, and both are normalized to the boolean form. For
/// vector-node models a node-level mask is expanded to a matrix-row mask by
/// replicating each node's flag three times contiguously (see [`Mask::repeat`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    selected: Vec<bool>,
}

impl Mask {
    /// Creates a mask from a boolean vector, one flag per node.
    pub fn from_bools(selected: Vec<bool>) -> Self {
        Self { selected }
    }

    /// Creates a mask from an integer index list over `node_count` nodes.
    ///
    /// Duplicate indices are tolerated; the result is the same as listing the
    /// index once.
    ///
    /// # Errors
    ///
    /// Returns [`MaskError::IndexOutOfRange`] if any index is `>= node_count`.
    pub fn from_indices(indices: &[usize], node_count: usize) -> Result<Self, MaskError> {
        let mut selected = vec![false; node_count];
        for &index in indices {
            if index >= node_count {
                return Err(MaskError::IndexOutOfRange {
                    index,
                    nodes: node_count,
                });
            }
            selected[index] = true;
        }
        Ok(Self { selected })
    }

    /// The number of nodes the mask covers.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The number of selected nodes.
    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|&&flag| flag).count()
    }

    pub fn is_selected(&self, node: usize) -> bool {
        self.selected.get(node).copied().unwrap_or(false)
    }

    /// Indices of the selected nodes, in ascending order.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| flag.then_some(i))
            .collect()
    }

    /// Indices of the unselected nodes, in ascending order.
    pub fn excluded_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &flag)| (!flag).then_some(i))
            .collect()
    }

    /// Expands the mask by replicating each node's flag `factor` times
    /// contiguously, turning a node mask into a matrix-row mask.
    pub fn repeat(&self, factor: usize) -> Mask {
        let mut selected = Vec::with_capacity(self.selected.len() * factor);
        for &flag in &self.selected {
            selected.extend(std::iter::repeat_n(flag, factor));
        }
        Mask { selected }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.selected
    }
}
