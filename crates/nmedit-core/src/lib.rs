//! # nmedit Core Library
//!
//! A library for editing coarse-grained structural-dynamics models: moving a
//! previously computed elastic-network or covariance model between
//! representations of a molecular system without rebuilding it from structure.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict two-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models: the tagged
//!   [`Model`](core::models::model::Model) variant over scalar-node (Kirchhoff),
//!   vector-node (Hessian), and covariance matrices, together with eigen data,
//!   node masks, atom mappings, and the injected selection-resolution seam.
//!
//! - **[`engine`]: The Logic Core.** The four one-shot transformation engines.
//!   `extend` expands a coarse model to a finer atom set, `slice` restricts
//!   eigenvector data to a masked subset, `trim` restricts the connectivity
//!   matrix and repairs its diagonal invariant, and `reduce` eliminates the
//!   unselected substructure analytically via the Schur complement.
//!
//! Model construction (Hessian/Kirchhoff/covariance builders), eigen
//! decomposition, and selection-expression parsing are external collaborators:
//! the engines consume their outputs (matrices, eigenpairs, masks, mappings)
//! but never implement them.

pub mod core;
pub mod engine;
