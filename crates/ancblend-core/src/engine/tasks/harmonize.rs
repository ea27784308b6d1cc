use crate::core::models::amino::AminoAcid;
use crate::core::models::distribution::SiteDistribution;
use crate::engine::error::EngineError;
use tracing::{info, instrument};

/// Posterior probability above which an alternate reconstruction is close
/// enough to substitute for a site's maximum-likelihood residue.
pub const DEFAULT_POSTERIOR_CUTOFF: f64 = 0.20;

/// Residue pairs treated as chemically interchangeable when minimizing the
/// distance between two reconstructions.
pub const EQUIVALENT_RESIDUES: [(AminoAcid, AminoAcid); 5] = [
    (AminoAcid::Asp, AminoAcid::Glu),
    (AminoAcid::Cys, AminoAcid::Ser),
    (AminoAcid::Lys, AminoAcid::Arg),
    (AminoAcid::Ser, AminoAcid::Thr),
    (AminoAcid::Asn, AminoAcid::Gln),
];

/// Outcome of harmonizing one site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Both ancestors can be assigned this residue.
    Resolved(AminoAcid),
    /// A real difference that cannot be merged away; carries both
    /// maximum-likelihood residues.
    Conflict(AminoAcid, AminoAcid),
}

impl std::fmt::Display for Call {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Call::Resolved(aa) => write!(f, "{aa}"),
            Call::Conflict(first, second) => write!(f, "{first}|{second}"),
        }
    }
}

/// One site's harmonization result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteCall {
    pub first_ml: AminoAcid,
    pub second_ml: AminoAcid,
    pub call: Call,
}

impl SiteCall {
    /// Whether the merged call equals the second ancestor's ML residue (the
    /// first ancestor is the favored one, so this is the interesting side).
    pub fn matches_second(&self) -> bool {
        matches!(self.call, Call::Resolved(aa) if aa == self.second_ml)
    }
}

fn is_equivalent_pair(a: AminoAcid, b: AminoAcid) -> bool {
    let pair = if a <= b { (a, b) } else { (b, a) };
    EQUIVALENT_RESIDUES.contains(&pair)
}

/// Harmonizes two independently reconstructed ancestors site by site,
/// minimizing their sequence distance within what phylogenetic uncertainty
/// and chemical equivalence allow.
///
/// Each site is resolved by the first applicable rule:
///
/// 1. identical ML residues — take that residue;
/// 2. ML residues form a chemically equivalent pair — take the first
///    ancestor's residue;
/// 3. either ancestor holds the other's ML residue above `cutoff` — take the
///    shared residue; when both qualify, take the first ancestor's ML residue
///    (the first ancestor is favored throughout, so it stays closest to its
///    own ML sequence);
/// 4. otherwise record an explicit conflict.
///
/// Distributions are renormalized and cysteine-folded before comparison.
///
/// # Errors
///
/// Returns [`EngineError::AncestorSiteMismatch`] if the two tables cover
/// different site counts and [`EngineError::EmptySite`] for a site without
/// probability mass.
#[instrument(skip_all, name = "harmonize_task")]
pub fn run(
    first: &[SiteDistribution],
    second: &[SiteDistribution],
    cutoff: f64,
) -> Result<Vec<SiteCall>, EngineError> {
    if first.len() != second.len() {
        return Err(EngineError::AncestorSiteMismatch {
            first: first.len(),
            second: second.len(),
        });
    }

    let mut calls = Vec::with_capacity(first.len());
    for (site, (first_dist, second_dist)) in first.iter().zip(second).enumerate() {
        let mut first_dist = first_dist.clone();
        let mut second_dist = second_dist.clone();
        for dist in [&mut first_dist, &mut second_dist] {
            dist.renormalize();
            dist.fold_cys_into_ser();
        }

        let first_ml = first_dist
            .ml_residue()
            .ok_or(EngineError::EmptySite { site })?;
        let second_ml = second_dist
            .ml_residue()
            .ok_or(EngineError::EmptySite { site })?;

        let call = if first_ml == second_ml {
            Call::Resolved(first_ml)
        } else if is_equivalent_pair(first_ml, second_ml) {
            Call::Resolved(first_ml)
        } else {
            let first_holds_second = first_dist.get(second_ml) > cutoff;
            let second_holds_first = second_dist.get(first_ml) > cutoff;
            match (first_holds_second, second_holds_first) {
                (true, true) => Call::Resolved(first_ml),
                (true, false) => Call::Resolved(second_ml),
                (false, true) => Call::Resolved(first_ml),
                (false, false) => Call::Conflict(first_ml, second_ml),
            }
        };

        calls.push(SiteCall {
            first_ml,
            second_ml,
            call,
        });
    }

    let conflicts = calls
        .iter()
        .filter(|c| matches!(c.call, Call::Conflict(..)))
        .count();
    info!(
        sites = calls.len(),
        conflicts, "Harmonized two ancestral reconstructions"
    );
    Ok(calls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::amino::AminoAcid::*;

    fn dist(pairs: &[(AminoAcid, f64)]) -> SiteDistribution {
        SiteDistribution::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn identical_ml_residues_resolve_immediately() {
        let calls = run(
            &[dist(&[(Ala, 0.9), (Gly, 0.1)])],
            &[dist(&[(Ala, 0.6), (Trp, 0.4)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Ala));
    }

    #[test]
    fn equivalent_pair_resolves_to_the_first_ancestor() {
        // K vs R are chemically interchangeable; the favored ancestor wins.
        let calls = run(
            &[dist(&[(Lys, 1.0)])],
            &[dist(&[(Arg, 1.0)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Lys));
        assert!(!calls[0].matches_second());
    }

    #[test]
    fn equivalence_is_symmetric() {
        let calls = run(
            &[dist(&[(Arg, 1.0)])],
            &[dist(&[(Lys, 1.0)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Arg));
    }

    #[test]
    fn high_posterior_alternate_in_the_first_ancestor_adopts_the_second_ml() {
        // First: W 0.7 / H 0.3, second: H 0.9 / F 0.1. The first ancestor
        // plausibly held H, so both sites can be H.
        let calls = run(
            &[dist(&[(Trp, 0.7), (His, 0.3)])],
            &[dist(&[(His, 0.9), (Phe, 0.1)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(His));
        assert!(calls[0].matches_second());
    }

    #[test]
    fn high_posterior_alternate_in_the_second_ancestor_keeps_the_first_ml() {
        let calls = run(
            &[dist(&[(Trp, 1.0)])],
            &[dist(&[(His, 0.7), (Trp, 0.3)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Trp));
    }

    #[test]
    fn mutual_alternates_favor_the_first_ancestor() {
        let calls = run(
            &[dist(&[(Trp, 0.6), (His, 0.4)])],
            &[dist(&[(His, 0.6), (Trp, 0.4)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Trp));
    }

    #[test]
    fn irreconcilable_sites_stay_conflicts() {
        let calls = run(
            &[dist(&[(Trp, 0.95), (Gly, 0.05)])],
            &[dist(&[(His, 0.95), (Phe, 0.05)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Conflict(Trp, His));
        assert!(!calls[0].matches_second());
    }

    #[test]
    fn cysteine_is_folded_into_serine_before_comparison() {
        // C folds into S on both sides, so C vs S becomes S vs S.
        let calls = run(
            &[dist(&[(Cys, 1.0)])],
            &[dist(&[(Ser, 1.0)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Ser));
    }

    #[test]
    fn unnormalized_tables_are_renormalized_before_the_cutoff_test() {
        // Second table sums to 2.0; raw H mass 0.5 would pass a 0.2 cutoff,
        // renormalized it is 0.25 and still passes.
        let calls = run(
            &[dist(&[(Trp, 1.0)])],
            &[dist(&[(His, 1.5), (Trp, 0.5)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap();
        assert_eq!(calls[0].call, Call::Resolved(Trp));
    }

    #[test]
    fn differing_site_counts_are_rejected() {
        let err = run(
            &[dist(&[(Ala, 1.0)]), dist(&[(Ala, 1.0)])],
            &[dist(&[(Ala, 1.0)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::AncestorSiteMismatch { first: 2, second: 1 }
        ));
    }

    #[test]
    fn empty_site_is_rejected() {
        let err = run(
            &[SiteDistribution::zero()],
            &[dist(&[(Ala, 1.0)])],
            DEFAULT_POSTERIOR_CUTOFF,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::EmptySite { site: 0 }));
    }
}
