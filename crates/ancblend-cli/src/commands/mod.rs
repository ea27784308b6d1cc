pub mod harmonize;
pub mod reconcile;
pub mod rescale;
