use crate::core::io::log::LogError;
use crate::core::io::newick::NewickError;
use crate::core::io::stockholm::StockholmError;
use crate::core::io::table::TableError;
use crate::core::models::class::StructuralClass;
use crate::core::models::site_map::SiteMapError;
use crate::engine::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// The engine-level error umbrella.
///
/// Every failure aborts the run: a reconciliation either completes for all
/// nodes and sites or not at all, since a silently incomplete mixture would be
/// scientifically misleading. Messages identify the class, node, site, or file
/// that triggered the failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read structural annotations: {0}")]
    Annotation(#[from] StockholmError),

    #[error("Failed to derive site classes: {0}")]
    SiteMap(#[from] SiteMapError),

    #[error("Failed to parse fit log: {0}")]
    Log(#[from] LogError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to read tables for class '{class}' from '{path}': {source}", path = path.display())]
    ClassTables {
        class: StructuralClass,
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Failed to read ancestor table '{path}': {source}", path = path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },

    #[error("Failed to rescale tree for class '{class}': {source}")]
    Rescale {
        class: StructuralClass,
        #[source]
        source: NewickError,
    },

    #[error(
        "Site-class map covers {map_sites} sites but the ancestor matrices cover {matrix_sites}"
    )]
    SiteMapLength {
        map_sites: usize,
        matrix_sites: usize,
    },

    #[error("Ancestor tables cover different site counts ({first} vs {second})")]
    AncestorSiteMismatch { first: usize, second: usize },

    #[error("Site {site} carries no probability mass")]
    EmptySite { site: usize },

    #[error("Output path '{path}' exists and is not a directory", path = path.display())]
    OutputNotADirectory { path: PathBuf },

    #[error("I/O error on '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An unchecked-precondition violation (e.g. combining before loading).
    /// Fatal by design; never a recoverable condition.
    #[error("Internal logic error: {0}")]
    Internal(String),
}
