//! # Engine Module
//!
//! The four stateless transformation engines that move a previously computed
//! model between representations of a molecular system.
//!
//! - **[`extend`]** - expand a coarse model, mode, or vector to a finer atom
//!   set through an externally built node-to-atom mapping
//! - **[`slice`]** - restrict eigenvector/displacement data to a masked
//!   subset of nodes; the connectivity matrix is not carried
//! - **[`trim`]** - restrict the connectivity matrix to a masked subset and
//!   repair the Laplacian diagonal invariant; eigen data is discarded
//! - **[`reduce`]** - restrict the connectivity matrix by analytically
//!   eliminating the unselected nodes (Schur complement); eigen data is
//!   discarded
//!
//! Every operation validates eagerly, reads its inputs without mutation, and
//! returns a new, independent result; concurrent calls on different models
//! need no synchronization. Trim and reduce outputs deliberately carry no
//! eigen data: recomputing modes on the new matrix is the caller's job, via
//! the external eigen-decomposition collaborator.

pub mod error;
pub mod extend;
pub mod reduce;
pub mod slice;
pub mod trim;
