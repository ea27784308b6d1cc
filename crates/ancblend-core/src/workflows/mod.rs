//! # Workflows Module
//!
//! The public, user-facing layer: each submodule executes one complete
//! procedure by wiring the stateless [`crate::core`] codecs into the
//! [`crate::engine`] pipeline.
//!
//! - [`reconcile`] - load the per-class reconstructions, combine them, and
//!   write the reconciled per-node ancestors
//! - [`rescale`] - write one branch-length-rescaled tree per structural class
//! - [`harmonize`] - merge two independently reconstructed ancestors

pub mod harmonize;
pub mod reconcile;
pub mod rescale;
