//! # ancblend Core Library
//!
//! A library for reconciling ancestral protein reconstructions that were computed
//! independently under several structural-class substitution models, producing a
//! single posterior-probability ancestor per tree node.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (the amino-acid
//!   alphabet, structural classes, per-site distributions, fitted parameter sets),
//!   file-format I/O for the upstream text formats, and small pure utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer owns the per-class ancestor
//!   matrices ([`engine::store::AncestorMatrixStore`]), enforces the cross-class
//!   consistency invariants, and implements the mixture and blend combination tasks.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to execute complete procedures:
//!   ancestor reconciliation, per-class tree rescaling, and two-ancestor
//!   harmonization.

pub mod core;
pub mod engine;
pub mod workflows;
