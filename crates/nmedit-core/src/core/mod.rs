//! # Core Module
//!
//! The data foundation of nmedit: stateless representations of
//! coarse-grained dynamics models and of the index structures the
//! transformation engines operate on.
//!
//! All types here are plain values. They are constructed with validated
//! setters, never mutated by the engines, and carry `serde` derives so
//! callers can persist edited models.

pub mod models;
