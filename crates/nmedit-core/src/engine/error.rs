use thiserror::Error;

use crate::core::models::eigen::EigenError;
use crate::core::models::mapping::MappingError;
use crate::core::models::mask::MaskError;
use crate::core::models::model::ModelError;
use crate::core::models::selection::SelectionError;

/// Errors raised by the transformation engines.
///
/// All preconditions are checked before any matrix work begins; a failed
/// check is a programming error on the caller's side, not a transient
/// condition. Singular matrices inside the reduce engine are not part of
/// this taxonomy: they are handled by the pseudo-inverse fallback and never
/// surfaced.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("model was built for {model_nodes} nodes, but {found} atoms were provided")]
    AtomCountMismatch { model_nodes: usize, found: usize },

    #[error("mask length {found} does not match model node count {expected}")]
    MaskLengthMismatch { expected: usize, found: usize },

    #[error("mask selects no nodes")]
    EmptySelection,

    #[error("model '{title}' has no {data} built")]
    MissingData { title: String, data: &'static str },

    #[error("invalid mask: {source}")]
    Mask {
        #[from]
        source: MaskError,
    },

    #[error("invalid atom mapping: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("invalid model data: {source}")]
    Model {
        #[from]
        source: ModelError,
    },

    #[error("invalid eigen data: {source}")]
    Eigen {
        #[from]
        source: EigenError,
    },

    #[error("selection resolution failed: {source}")]
    Selection {
        #[from]
        source: SelectionError,
    },

    #[error("internal numeric error: {0}")]
    Internal(String),
}
