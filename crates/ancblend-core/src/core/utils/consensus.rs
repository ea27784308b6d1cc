use std::collections::BTreeMap;

/// Symbol recorded when no single secondary-structure call dominates a column.
pub const AMBIGUOUS_STRUCTURE: char = '?';
/// Symbol recorded when a column carries no structural information at all.
pub const NO_INFORMATION: char = '.';
/// Call used for structures whose assignment program left the field blank.
const COIL: char = 'C';

/// One structure's observation of an alignment column: its secondary-structure
/// call and its fractional solvent accessibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteObservation {
    pub secondary_structure: char,
    pub accessibility: f64,
}

/// Returns the unique most common symbol, or `None` when the multiset is empty
/// or the top count is shared.
///
/// The tie outcome is explicit: callers record an ambiguity marker instead of
/// silently picking whichever tied symbol an iteration order happens to visit
/// first.
pub fn unique_mode<I>(symbols: I) -> Option<char>
where
    I: IntoIterator<Item = char>,
{
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for symbol in symbols {
        *counts.entry(symbol).or_insert(0) += 1;
    }

    let (&best, &best_count) = counts.iter().max_by_key(|&(_, &count)| count)?;
    let tied = counts.values().filter(|&&count| count == best_count).count();
    (tied == 1).then_some(best)
}

/// Bins a mean fractional solvent accessibility into a single digit `0`–`9`.
///
/// Fully buried (mean 0) maps to `0`; otherwise the mean is clamped to
/// \[0, 1\] and binned in tenths, so 1.0 lands in the top bin `9`.
pub fn accessibility_bin(mean: f64) -> char {
    if mean <= 0.0 {
        return '0';
    }
    let clamped = mean.min(1.0);
    let bin = (clamped * 10.0).ceil() as u32 - 1;
    char::from_digit(bin, 10).unwrap_or('9')
}

/// Collapses per-structure observations of one column into its consensus
/// secondary-structure and accessibility symbols.
///
/// With no observations, both symbols are [`NO_INFORMATION`]. Otherwise the
/// secondary structure is the unique mode of the observed calls (ambiguity
/// marker on a tie, coil for blank calls) and the accessibility is the binned
/// mean.
pub fn consensus_site(observations: &[SiteObservation]) -> (char, char) {
    if observations.is_empty() {
        return (NO_INFORMATION, NO_INFORMATION);
    }

    let mut structure =
        unique_mode(observations.iter().map(|o| o.secondary_structure))
            .unwrap_or(AMBIGUOUS_STRUCTURE);
    if structure == ' ' {
        structure = COIL;
    }

    let mean = observations.iter().map(|o| o.accessibility).sum::<f64>()
        / observations.len() as f64;

    (structure, accessibility_bin(mean))
}

/// Builds the consensus annotation strings for a whole alignment, one
/// [`consensus_site`] call per column.
pub fn consensus_annotations(columns: &[Vec<SiteObservation>]) -> (String, String) {
    let mut secondary_structure = String::with_capacity(columns.len());
    let mut accessibility = String::with_capacity(columns.len());
    for observations in columns {
        let (ss, sa) = consensus_site(observations);
        secondary_structure.push(ss);
        accessibility.push(sa);
    }
    (secondary_structure, accessibility)
}
