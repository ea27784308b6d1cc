use super::amino::{ALPHABET_SIZE, AminoAcid};

/// A per-site posterior probability distribution over the 20 amino acids.
///
/// Stored dense, indexed by [`AminoAcid::index`]. Upstream producers truncate
/// low-probability tails, so the entries need not sum to exactly 1; residues
/// absent from an input table simply hold probability 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SiteDistribution([f64; ALPHABET_SIZE]);

impl SiteDistribution {
    /// The all-zero distribution.
    pub const fn zero() -> Self {
        Self([0.0; ALPHABET_SIZE])
    }

    /// Builds a distribution from `(residue, probability)` pairs; residues not
    /// mentioned stay at 0. Later pairs overwrite earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (AminoAcid, f64)>,
    {
        let mut dist = Self::zero();
        for (aa, p) in pairs {
            dist.0[aa.index()] = p;
        }
        dist
    }

    #[inline]
    pub fn get(&self, aa: AminoAcid) -> f64 {
        self.0[aa.index()]
    }

    #[inline]
    pub fn set(&mut self, aa: AminoAcid, p: f64) {
        self.0[aa.index()] = p;
    }

    /// Iterates `(residue, probability)` in column order.
    pub fn iter(&self) -> impl Iterator<Item = (AminoAcid, f64)> + '_ {
        AminoAcid::ALL.iter().map(|&aa| (aa, self.0[aa.index()]))
    }

    /// Sum over all residues.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// The maximum-likelihood residue, or `None` for the all-zero distribution.
    ///
    /// Ties resolve to the residue earliest in the alphabet.
    pub fn ml_residue(&self) -> Option<AminoAcid> {
        self.ranked().first().map(|&(aa, _)| aa)
    }

    /// Residues ranked by descending probability, ties broken by ascending
    /// one-letter code, truncated at the first zero entry.
    ///
    /// This is the canonical listing used by the table writer; the tie-break
    /// makes the output deterministic where the upstream format leaves the
    /// order of equal-probability residues unspecified.
    pub fn ranked(&self) -> Vec<(AminoAcid, f64)> {
        let mut entries: Vec<(AminoAcid, f64)> = self
            .iter()
            .filter(|&(_, p)| p > 0.0)
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    /// Scales the distribution so it sums to 1. A zero-total distribution is
    /// left untouched.
    pub fn renormalize(&mut self) {
        let total = self.total();
        if total > 0.0 {
            for p in &mut self.0 {
                *p /= total;
            }
        }
    }

    /// Folds all cysteine probability into serine.
    ///
    /// Used by the harmonization task, where disulfide-prone cysteines are
    /// treated as chemically interchangeable with serine before comparing two
    /// reconstructions.
    pub fn fold_cys_into_ser(&mut self) {
        let cys = self.get(AminoAcid::Cys);
        if cys > 0.0 {
            self.set(AminoAcid::Ser, self.get(AminoAcid::Ser) + cys);
            self.set(AminoAcid::Cys, 0.0);
        }
    }
}

impl FromIterator<(AminoAcid, f64)> for SiteDistribution {
    fn from_iter<I: IntoIterator<Item = (AminoAcid, f64)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
