use crate::core::models::class::ClassKey;
use crate::core::models::distribution::SiteDistribution;
use crate::core::models::params::ClassParameterSet;
use crate::engine::error::EngineError;
use crate::engine::store::{AncestorMatrixStore, ClassMatrices};
use tracing::{info, instrument};

/// Computes the class-frequency-weighted mixture and stores it under
/// [`ClassKey::Mixture`].
///
/// For every node, site, and residue:
///
/// ```text
/// mix[node][site][aa] = Σ over classes of store[class][node][site][aa] · fraction[class]
/// ```
///
/// A convex combination: with each input distribution summing to at most 1 and
/// the fractions summing to 1 (validated when the parameter set was built),
/// the result also sums to at most 1.
///
/// The store must already hold exactly the classes of `params`; this task
/// performs no I/O and adds no recoverable error kinds — a mismatch means the
/// caller skipped or reordered the load phase and surfaces as
/// [`EngineError::Internal`].
#[instrument(skip_all, name = "mixture_task")]
pub fn run(
    store: &mut AncestorMatrixStore,
    params: &ClassParameterSet,
) -> Result<(), EngineError> {
    let loaded: Vec<_> = store.structural_classes().collect();
    let fitted: Vec<_> = params.classes().map(|(class, _)| class).collect();
    if loaded != fitted {
        return Err(EngineError::Internal(format!(
            "Loaded classes [{}] do not match fitted classes [{}]",
            join_tags(&loaded),
            join_tags(&fitted),
        )));
    }

    let mut mixture = ClassMatrices::new();
    for &node in store.node_ids() {
        let mut sites = vec![SiteDistribution::zero(); store.site_count()];
        for (class, class_params) in params.classes() {
            let class_sites = store
                .node_sites(ClassKey::Structural(class), node)
                .ok_or_else(|| {
                    EngineError::Internal(format!(
                        "Node {node} missing from loaded class '{class}'"
                    ))
                })?;
            for (site, dist) in class_sites.iter().enumerate() {
                let mixed = &mut sites[site];
                for (aa, probability) in dist.iter() {
                    mixed.set(
                        aa,
                        mixed.get(aa) + probability * class_params.class_fraction,
                    );
                }
            }
        }
        mixture.insert(node, sites);
    }

    let nodes = mixture.len();
    store.put(ClassKey::Mixture, mixture)?;
    info!(
        nodes,
        sites = store.site_count(),
        classes = params.len(),
        "Computed class-frequency-weighted mixture"
    );
    Ok(())
}

fn join_tags(classes: &[crate::core::models::class::StructuralClass]) -> String {
    classes
        .iter()
        .map(|c| c.tag())
        .collect::<Vec<_>>()
        .join(", ")
}
