use crate::core::io::table;
use crate::engine::error::EngineError;
use crate::engine::tasks::harmonize::{self, SiteCall};
use std::path::Path;
use tracing::instrument;

/// Harmonizes two ancestor tables read from disk.
///
/// Thin wrapper around [`harmonize::run`](crate::engine::tasks::harmonize::run)
/// that attaches file context to table-reading failures.
#[instrument(skip_all, name = "harmonize_workflow")]
pub fn run(
    first_path: &Path,
    second_path: &Path,
    cutoff: f64,
) -> Result<Vec<SiteCall>, EngineError> {
    let first = table::read_from_path(first_path).map_err(|source| EngineError::Table {
        path: first_path.to_path_buf(),
        source,
    })?;
    let second = table::read_from_path(second_path).map_err(|source| EngineError::Table {
        path: second_path.to_path_buf(),
        source,
    })?;
    harmonize::run(&first, &second, cutoff)
}
