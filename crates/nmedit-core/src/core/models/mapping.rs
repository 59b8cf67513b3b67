use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MappingError {
    #[error("atom mapping entry {atom} points to node {node}, but only {nodes} nodes exist")]
    NodeIndexOutOfRange {
        atom: usize,
        node: usize,
        nodes: usize,
    },
}

/// A node-to-atom mapping produced by the atom-selection collaborator.
///
/// Entry `a` names the coarse node that fine atom `a` inherits its motion
/// from; typically every atom of a residue maps to that residue's
/// representative node. The extend engine consumes the mapping read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomMapping {
    node_of_atom: Vec<usize>,
    node_count: usize,
}

impl AtomMapping {
    /// Creates a mapping over `node_count` coarse nodes.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NodeIndexOutOfRange`] if any entry names a
    /// node `>= node_count`.
    pub fn new(node_of_atom: Vec<usize>, node_count: usize) -> Result<Self, MappingError> {
        for (atom, &node) in node_of_atom.iter().enumerate() {
            if node >= node_count {
                return Err(MappingError::NodeIndexOutOfRange {
                    atom,
                    node,
                    nodes: node_count,
                });
            }
        }
        Ok(Self {
            node_of_atom,
            node_count,
        })
    }

    /// The number of fine atoms covered by the mapping.
    pub fn atom_count(&self) -> usize {
        self.node_of_atom.len()
    }

    /// The number of coarse nodes the mapping points into.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn node_of(&self, atom: usize) -> Option<usize> {
        self.node_of_atom.get(atom).copied()
    }

    /// The eigenvector-row gather list for the mapping: node `n` contributes
    /// row `n` for scalar data, or the three consecutive rows `3n..3n+3` for
    /// 3D data.
    pub fn row_indices(&self, is_3d: bool) -> Vec<usize> {
        if is_3d {
            let mut rows = Vec::with_capacity(self.node_of_atom.len() * 3);
            for &node in &self.node_of_atom {
                rows.extend([3 * node, 3 * node + 1, 3 * node + 2]);
            }
            rows
        } else {
            self.node_of_atom.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_node_index_out_of_range() {
        let result = AtomMapping::new(vec![0, 2], 2);
        assert_eq!(
            result.unwrap_err(),
            MappingError::NodeIndexOutOfRange {
                atom: 1,
                node: 2,
                nodes: 2
            }
        );
    }

    #[test]
    fn row_indices_scalar_is_the_node_list() {
        let mapping = AtomMapping::new(vec![0, 0, 1, 1, 1], 2).unwrap();
        assert_eq!(mapping.atom_count(), 5);
        assert_eq!(mapping.row_indices(false), vec![0, 0, 1, 1, 1]);
    }

    #[test]
    fn row_indices_3d_replicates_three_consecutive_rows_per_atom() {
        let mapping = AtomMapping::new(vec![1, 0], 2).unwrap();
        assert_eq!(mapping.row_indices(true), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn node_of_returns_entry_or_none() {
        let mapping = AtomMapping::new(vec![1, 0], 2).unwrap();
        assert_eq!(mapping.node_of(0), Some(1));
        assert_eq!(mapping.node_of(2), None);
    }
}
