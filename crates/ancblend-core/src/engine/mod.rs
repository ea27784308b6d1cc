//! # Engine Module
//!
//! This module implements the stateful heart of the reconciliation pipeline:
//! ownership of the per-class ancestor matrices, the cross-class consistency
//! invariants, and the combination tasks that derive the mixture and final
//! pseudo-classes.
//!
//! ## Architecture
//!
//! - **Matrix Store** ([`store`]) - The per-class, per-node, per-site matrices
//!   and their load-time validation
//! - **Tasks** ([`tasks`]) - The mixture, blend, and harmonization algorithms
//! - **Configuration** ([`config`]) - Pipeline parameters and the TOML config layer
//! - **Progress Monitoring** ([`progress`]) - Stage/step reporting callbacks
//! - **Error Handling** ([`error`]) - The engine-level error umbrella
//!
//! Every task takes its inputs explicitly (store, parameter set, site map) and
//! returns newly derived matrices through the store's overwrite-free `put`;
//! nothing is mutated in place, so there are no hidden ordering dependencies
//! beyond "load before combine".

pub mod config;
pub mod error;
pub mod progress;
pub mod store;
pub mod tasks;
