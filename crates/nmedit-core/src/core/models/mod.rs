//! # Core Models Module
//!
//! This module contains the fundamental data structures used to represent
//! coarse-grained structural-dynamics models and the index structures that
//! restrict or expand them.
//!
//! ## Key Components
//!
//! - [`model`] - The [`Model`](model::Model) tagged variant (scalar-node,
//!   vector-node, covariance) with its matrix, eigen data, and mode views
//! - [`eigen`] - Eigenvector/eigenvalue sets and bare displacement vectors
//! - [`mask`] - Node masks in boolean or index form, normalized to boolean
//! - [`mapping`] - Node-to-atom mappings produced by the selection collaborator
//! - [`selection`] - The injected selection-resolution seam and the atom-subset
//!   handle returned for traceability
//!
//! ## Usage
//!
//! Models are built by external collaborators (matrix builders, eigen solvers)
//! and handed to the [`engine`](crate::engine) layer, which reads them and
//! produces new, independent instances.
//!
//! ```ignore
//! use nmedit::core::models::{mask::Mask, model::Model};
//!
//! let mut model = Model::scalar_node("lysozyme GNM");
//! model.set_matrix(kirchhoff)?;
//! let mask = Mask::from_indices(&[0, 1, 5], model.node_count())?;
//! ```

pub mod eigen;
pub mod mapping;
pub mod mask;
pub mod model;
pub mod selection;
