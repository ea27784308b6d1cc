use crate::core::models::class::ClassKey;
use crate::core::models::distribution::SiteDistribution;
use crate::core::models::params::ClassParameterSet;
use crate::core::models::site_map::SiteClassMap;
use crate::engine::error::EngineError;
use crate::engine::store::{AncestorMatrixStore, ClassMatrices};
use tracing::{info, instrument};

/// Blends each site's own structural class with the mixture and stores the
/// result under [`ClassKey::Final`].
///
/// With `r` the global final rate and `C` the class assigned to a site:
///
/// ```text
/// final[node][site][aa] = store[C][node][site][aa] · (1 − r) + mix[node][site][aa] · r
/// ```
///
/// Sites whose structural annotation is informative lean toward their own
/// class's reconstruction; a large `r` compensates globally uncertain
/// structural assignment by pulling toward the population mixture.
///
/// Requires the mixture task to have run and the site-class map to span
/// exactly the matrices' site count; the map length check is a data-integrity
/// failure ([`EngineError::SiteMapLength`]), everything else here is an
/// unchecked precondition surfacing as [`EngineError::Internal`].
#[instrument(skip_all, name = "blend_task")]
pub fn run(
    store: &mut AncestorMatrixStore,
    params: &ClassParameterSet,
    site_map: &SiteClassMap,
) -> Result<(), EngineError> {
    if site_map.len() != store.site_count() {
        return Err(EngineError::SiteMapLength {
            map_sites: site_map.len(),
            matrix_sites: store.site_count(),
        });
    }
    if !store.contains(ClassKey::Mixture) {
        return Err(EngineError::Internal(
            "Final blend requested before the mixture was computed".to_string(),
        ));
    }

    let rate = params.final_rate();
    let mut blended = ClassMatrices::new();
    for &node in store.node_ids() {
        let mix_sites = store
            .node_sites(ClassKey::Mixture, node)
            .ok_or_else(|| {
                EngineError::Internal(format!("Node {node} missing from the mixture"))
            })?;

        let mut sites = Vec::with_capacity(store.site_count());
        for (site, own_class) in site_map.iter().enumerate() {
            let own = store
                .get(ClassKey::Structural(own_class), node, site)
                .ok_or_else(|| {
                    EngineError::Internal(format!(
                        "Site {site} is assigned to class '{own_class}' which was never loaded"
                    ))
                })?;

            let mut dist = SiteDistribution::zero();
            for (aa, own_probability) in own.iter() {
                dist.set(
                    aa,
                    own_probability * (1.0 - rate) + mix_sites[site].get(aa) * rate,
                );
            }
            sites.push(dist);
        }
        blended.insert(node, sites);
    }

    let nodes = blended.len();
    store.put(ClassKey::Final, blended)?;
    info!(
        nodes,
        sites = store.site_count(),
        final_rate = rate,
        "Blended per-site classes with the mixture"
    );
    Ok(())
}
