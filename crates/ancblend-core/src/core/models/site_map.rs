use super::class::{Burial, SecondaryStructure, StructuralClass};
use thiserror::Error;

/// Represents errors raised while deriving the per-site class assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SiteMapError {
    #[error(
        "Secondary-structure and accessibility annotations differ in length ({ss_len} vs {sa_len})"
    )]
    LengthMismatch { ss_len: usize, sa_len: usize },

    #[error("Structural annotations are empty")]
    Empty,
}

/// A fixed assignment of every alignment column to exactly one structural
/// class.
///
/// Derived once from the consensus secondary-structure and solvent-
/// accessibility annotation strings and immutable afterwards. Its length must
/// match the site count of every loaded ancestor matrix; that check belongs to
/// the pipeline, not to this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteClassMap {
    classes: Vec<StructuralClass>,
}

impl SiteClassMap {
    /// Classifies each column from parallel annotation strings.
    ///
    /// The rule is fixed and order-independent: `H` maps to helix, `E` to
    /// strand, any other secondary-structure symbol to "other"; an
    /// accessibility symbol of `0` (fully buried bin) or `.` (no structural
    /// information) maps to buried, anything else to exposed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteMapError::LengthMismatch`] if the annotation strings
    /// differ in length, and [`SiteMapError::Empty`] if both are empty.
    pub fn from_annotations(ss: &str, sa: &str) -> Result<Self, SiteMapError> {
        let ss_chars: Vec<char> = ss.chars().collect();
        let sa_chars: Vec<char> = sa.chars().collect();

        if ss_chars.len() != sa_chars.len() {
            return Err(SiteMapError::LengthMismatch {
                ss_len: ss_chars.len(),
                sa_len: sa_chars.len(),
            });
        }
        if ss_chars.is_empty() {
            return Err(SiteMapError::Empty);
        }

        let classes = ss_chars
            .iter()
            .zip(&sa_chars)
            .map(|(&ss_symbol, &sa_symbol)| {
                let structure = match ss_symbol {
                    'H' => SecondaryStructure::Helix,
                    'E' => SecondaryStructure::Strand,
                    _ => SecondaryStructure::Other,
                };
                let burial = match sa_symbol {
                    '0' | '.' => Burial::Buried,
                    _ => Burial::Exposed,
                };
                StructuralClass::new(burial, structure)
            })
            .collect();

        Ok(Self { classes })
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class of a single site.
    pub fn class_of(&self, site: usize) -> Option<StructuralClass> {
        self.classes.get(site).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = StructuralClass> + '_ {
        self.classes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_helix_strand_and_other_symbols() {
        let map = SiteClassMap::from_annotations("HEC?", "5301").unwrap();
        let classes: Vec<StructuralClass> = map.iter().collect();
        assert_eq!(
            classes,
            vec![
                StructuralClass::new(Burial::Exposed, SecondaryStructure::Helix),
                StructuralClass::new(Burial::Exposed, SecondaryStructure::Strand),
                StructuralClass::new(Burial::Buried, SecondaryStructure::Other),
                StructuralClass::new(Burial::Exposed, SecondaryStructure::Other),
            ]
        );
    }

    #[test]
    fn zero_and_dot_accessibility_mean_buried() {
        let map = SiteClassMap::from_annotations("HH", "0.").unwrap();
        assert!(map.iter().all(|c| c.burial == Burial::Buried));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = SiteClassMap::from_annotations("HEH", "00").unwrap_err();
        assert_eq!(err, SiteMapError::LengthMismatch { ss_len: 3, sa_len: 2 });
    }

    #[test]
    fn empty_annotations_are_rejected() {
        assert_eq!(
            SiteClassMap::from_annotations("", "").unwrap_err(),
            SiteMapError::Empty
        );
    }
}
