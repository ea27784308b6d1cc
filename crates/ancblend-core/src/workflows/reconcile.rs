use crate::core::io::{log, stockholm, table};
use crate::core::models::class::{ClassKey, StructuralClass};
use crate::core::models::site_map::SiteClassMap;
use crate::engine::config::ReconcileConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::store::{AncestorMatrixStore, ClassMatrices};
use crate::engine::tasks::{blend, mixture};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// What a completed reconciliation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub nodes: usize,
    pub sites: usize,
    pub classes: usize,
    pub output_dir: PathBuf,
}

/// Runs the full reconciliation pipeline.
///
/// Reads the structural annotations and the fit log, loads every class's
/// per-node tables, derives the mixture and final pseudo-classes, and writes
/// one reconciled table per node into the configured output directory.
///
/// Class tables are read concurrently (they are independent until combined),
/// but the cross-class consistency checks run after all reads complete, in
/// class-tag order, so error reporting is deterministic regardless of read
/// scheduling.
///
/// # Errors
///
/// Any validation or I/O failure aborts the whole run; there is no partial
/// success. See [`EngineError`] for the taxonomy.
#[instrument(skip_all, name = "reconcile_workflow")]
pub fn run(
    config: &ReconcileConfig,
    reporter: &ProgressReporter,
) -> Result<ReconcileSummary, EngineError> {
    // === Stage 1: parameters and site classes ===
    reporter.report(Progress::StageStart {
        name: "Reading inputs",
        steps: 0,
    });
    let annotations = stockholm::read_from_path(&config.alignment_path)?;
    let site_map = SiteClassMap::from_annotations(
        &annotations.secondary_structure,
        &annotations.accessibility,
    )?;
    let params = log::read_from_path(&config.log_path)?;
    info!(
        classes = params.len(),
        sites = site_map.len(),
        final_rate = params.final_rate(),
        "Parsed fit parameters and site classes"
    );
    reporter.report(Progress::StageFinish);

    // === Stage 2: per-class ancestor tables ===
    let class_list: Vec<StructuralClass> = params.classes().map(|(class, _)| class).collect();
    reporter.report(Progress::StageStart {
        name: "Loading class reconstructions",
        steps: class_list.len() as u64,
    });
    let loaded: Vec<(StructuralClass, Result<ClassMatrices, table::TableError>)> = class_list
        .par_iter()
        .map(|&class| (class, table::read_class_dir(config.class_dir(class.tag()))))
        .collect();

    let mut store = AncestorMatrixStore::new();
    for (class, result) in loaded {
        let tables = result.map_err(|source| EngineError::ClassTables {
            class,
            path: config.class_dir(class.tag()),
            source,
        })?;
        store.load(class, tables)?;
        reporter.report(Progress::StageAdvance);
    }
    info!(
        nodes = store.node_ids().len(),
        sites = store.site_count(),
        "Loaded and cross-validated all class reconstructions"
    );
    reporter.report(Progress::StageFinish);

    // === Stage 3: combination ===
    reporter.report(Progress::StageStart {
        name: "Combining",
        steps: 0,
    });
    mixture::run(&mut store, &params)?;
    blend::run(&mut store, &params, &site_map)?;
    reporter.report(Progress::StageFinish);

    // === Stage 4: output ===
    reporter.report(Progress::StageStart {
        name: "Writing reconciled ancestors",
        steps: store.node_ids().len() as u64,
    });
    write_final_ancestors(&store, &config.output_dir, reporter)?;
    reporter.report(Progress::StageFinish);

    Ok(ReconcileSummary {
        nodes: store.node_ids().len(),
        sites: store.site_count(),
        classes: params.len(),
        output_dir: config.output_dir.clone(),
    })
}

/// Writes the final pseudo-class, one `node<N>.dat` per node.
///
/// The output directory is created if absent and reused if present; a path
/// that exists but is not a directory is refused.
fn write_final_ancestors(
    store: &AncestorMatrixStore,
    output_dir: &Path,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(EngineError::OutputNotADirectory {
            path: output_dir.to_path_buf(),
        });
    }
    std::fs::create_dir_all(output_dir).map_err(|source| EngineError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    for &node in store.node_ids() {
        let sites = store
            .node_sites(ClassKey::Final, node)
            .ok_or_else(|| {
                EngineError::Internal(format!(
                    "Node {node} missing from the final pseudo-class"
                ))
            })?;
        let path = output_dir.join(table::node_file_name(node));
        table::write_to_path(sites, &path).map_err(|source| EngineError::Io { path, source })?;
        reporter.report(Progress::StageAdvance);
    }

    info!(
        nodes = store.node_ids().len(),
        output = %output_dir.display(),
        "Wrote reconciled ancestors"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::amino::AminoAcid::*;
    use crate::engine::config::ReconcileConfigBuilder;
    use std::fs;
    use std::path::Path;

    const LOG: &str = "\
. Final log likelihood value = -100.0
H-bur 0.5 0.6
E-exp 0.5 0.4
Conf = 0.9;
final rate == 0.3
";

    const ALIGNMENT: &str = "\
#=GR SS_cons HE
#=GR SA_cons 05
";

    fn write_fixture(root: &Path) -> ReconcileConfig {
        fs::write(root.join("fit.log"), LOG).unwrap();
        fs::write(root.join("aln.phy"), ALIGNMENT).unwrap();

        fs::create_dir(root.join("class_bh")).unwrap();
        fs::write(
            root.join("class_bh/node4.dat"),
            "1  A 0.900 G 0.100\n2  W 1.000\n",
        )
        .unwrap();
        fs::create_dir(root.join("class_ee")).unwrap();
        fs::write(
            root.join("class_ee/node4.dat"),
            "1  G 0.800 A 0.200\n2  W 0.500 Y 0.500\n",
        )
        .unwrap();

        ReconcileConfigBuilder::new()
            .alignment_path(root.join("aln.phy"))
            .log_path(root.join("fit.log"))
            .class_root(root.to_path_buf())
            .output_dir(root.join("final_anc"))
            .build()
            .unwrap()
    }

    #[test]
    fn pipeline_produces_hand_computed_reconciled_tables() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());

        let summary = run(&config, &ProgressReporter::new()).unwrap();
        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.sites, 2);
        assert_eq!(summary.classes, 2);

        // Site 0 (buried helix): 0.7*{A:0.9,G:0.1} + 0.3*(0.6*{A:0.9,G:0.1} + 0.4*{A:0.2,G:0.8})
        //                      = {A:0.816, G:0.184}
        // Site 1 (exposed strand): 0.7*{W:0.5,Y:0.5} + 0.3*{W:0.8,Y:0.2}
        //                        = {W:0.59, Y:0.41}
        let written = fs::read_to_string(dir.path().join("final_anc/node4.dat")).unwrap();
        assert_eq!(written, "1  A 0.816 G 0.184\n2  W 0.590 Y 0.410\n");
    }

    #[test]
    fn written_tables_round_trip_through_the_table_reader() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        run(&config, &ProgressReporter::new()).unwrap();

        let reread =
            table::read_from_path(dir.path().join("final_anc/node4.dat")).unwrap();
        assert_eq!(reread.len(), 2);
        let ranked = reread[0].ranked();
        assert_eq!(ranked[0].0, Ala);
        assert!((ranked[0].1 - 0.816).abs() < 1e-9);
        assert_eq!(ranked[1].0, Gly);
        assert!((ranked[1].1 - 0.184).abs() < 1e-9);
    }

    #[test]
    fn existing_output_directory_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        fs::create_dir(dir.path().join("final_anc")).unwrap();
        assert!(run(&config, &ProgressReporter::new()).is_ok());
    }

    #[test]
    fn output_path_that_is_a_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        fs::write(dir.path().join("final_anc"), "in the way").unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::OutputNotADirectory { .. }));
    }

    #[test]
    fn node_set_mismatch_across_classes_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        fs::write(
            dir.path().join("class_ee/node9.dat"),
            "1  A 1.000\n2  A 1.000\n",
        )
        .unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(crate::engine::store::StoreError::InconsistentNodeSet { .. })
        ));
    }

    #[test]
    fn site_count_mismatch_across_classes_aborts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        fs::write(dir.path().join("class_ee/node4.dat"), "1  A 1.000\n").unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Store(
                crate::engine::store::StoreError::InconsistentSiteCount { .. }
            )
        ));
    }

    #[test]
    fn missing_class_directory_identifies_the_class() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_fixture(dir.path());
        fs::remove_dir_all(dir.path().join("class_ee")).unwrap();
        let err = run(&config, &ProgressReporter::new()).unwrap_err();
        match err {
            EngineError::ClassTables { class, .. } => assert_eq!(class.tag(), "ee"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
