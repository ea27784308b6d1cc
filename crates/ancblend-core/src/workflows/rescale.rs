use crate::core::io::{log, newick};
use crate::engine::error::EngineError;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Writes one branch-length-rescaled tree per structural class.
///
/// Every class's tree is the input tree with each branch length multiplied by
/// that class's rate scaler (already normalized to the final rate when the
/// log was parsed), written as `<tag>_<tree-file-name>` into `output_dir`.
/// The directory is created if absent and reused if present.
///
/// Returns the written paths in class-tag order.
///
/// # Errors
///
/// Propagates log parsing failures, [`EngineError::Rescale`] naming the class
/// whose rescaling hit an unparseable branch length, and I/O failures with
/// the offending path.
#[instrument(skip_all, name = "rescale_workflow")]
pub fn run(
    log_path: &Path,
    tree_path: &Path,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, EngineError> {
    let params = log::read_from_path(log_path)?;
    let tree = std::fs::read_to_string(tree_path).map_err(|source| EngineError::Io {
        path: tree_path.to_path_buf(),
        source,
    })?;
    let tree_name = tree_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            EngineError::Internal(format!(
                "Tree path '{}' has no file name",
                tree_path.display()
            ))
        })?;

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(EngineError::OutputNotADirectory {
            path: output_dir.to_path_buf(),
        });
    }
    std::fs::create_dir_all(output_dir).map_err(|source| EngineError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::with_capacity(params.len());
    for (class, class_params) in params.classes() {
        let rescaled = newick::rescale_branch_lengths(&tree, class_params.rate_scaler)
            .map_err(|source| EngineError::Rescale { class, source })?;

        let path = output_dir.join(format!("{}_{}", class.tag(), tree_name));
        std::fs::write(&path, rescaled).map_err(|source| EngineError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    info!(
        trees = written.len(),
        output = %output_dir.display(),
        "Wrote per-class rescaled trees"
    );
    Ok(written)
}
