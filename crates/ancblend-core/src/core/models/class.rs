use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Solvent-burial state of an alignment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Burial {
    Buried,
    Exposed,
}

/// Secondary-structure state of an alignment column.
///
/// Anything that is neither a helix nor a strand call collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SecondaryStructure {
    Helix,
    Strand,
    Other,
}

/// One of the six real structural classes: the Cartesian product of burial
/// and secondary-structure state.
///
/// Each class selects a site-specific substitution model upstream, so every
/// alignment column is assigned exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructuralClass {
    pub burial: Burial,
    pub structure: SecondaryStructure,
}

impl StructuralClass {
    pub const fn new(burial: Burial, structure: SecondaryStructure) -> Self {
        Self { burial, structure }
    }

    /// All six classes, in tag order. This is the deterministic iteration
    /// order used everywhere a per-class loop must be reproducible.
    pub const ALL: [StructuralClass; 6] = [
        StructuralClass::new(Burial::Buried, SecondaryStructure::Helix),
        StructuralClass::new(Burial::Buried, SecondaryStructure::Strand),
        StructuralClass::new(Burial::Buried, SecondaryStructure::Other),
        StructuralClass::new(Burial::Exposed, SecondaryStructure::Helix),
        StructuralClass::new(Burial::Exposed, SecondaryStructure::Strand),
        StructuralClass::new(Burial::Exposed, SecondaryStructure::Other),
    ];

    /// Two-letter tag: burial (`b`/`e`) followed by structure (`h`/`e`/`o`).
    pub const fn tag(self) -> &'static str {
        match (self.burial, self.structure) {
            (Burial::Buried, SecondaryStructure::Helix) => "bh",
            (Burial::Buried, SecondaryStructure::Strand) => "be",
            (Burial::Buried, SecondaryStructure::Other) => "bo",
            (Burial::Exposed, SecondaryStructure::Helix) => "eh",
            (Burial::Exposed, SecondaryStructure::Strand) => "ee",
            (Burial::Exposed, SecondaryStructure::Other) => "eo",
        }
    }

    /// The label this class carries in the fit log (e.g. `H-bur`, `E-exp`).
    pub const fn log_label(self) -> &'static str {
        match (self.burial, self.structure) {
            (Burial::Buried, SecondaryStructure::Helix) => "H-bur",
            (Burial::Buried, SecondaryStructure::Strand) => "E-bur",
            (Burial::Buried, SecondaryStructure::Other) => "O-bur",
            (Burial::Exposed, SecondaryStructure::Helix) => "H-exp",
            (Burial::Exposed, SecondaryStructure::Strand) => "E-exp",
            (Burial::Exposed, SecondaryStructure::Other) => "O-exp",
        }
    }

    pub fn from_tag(tag: &str) -> Option<StructuralClass> {
        StructuralClass::ALL.into_iter().find(|c| c.tag() == tag)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown structural-class tag '{0}'")]
pub struct UnknownClassError(pub String);

impl FromStr for StructuralClass {
    type Err = UnknownClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StructuralClass::from_tag(s).ok_or_else(|| UnknownClassError(s.to_string()))
    }
}

impl fmt::Display for StructuralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Key under which a set of ancestor matrices is stored.
///
/// The six real classes come from independent reconstruction runs; the two
/// pseudo classes are derived by the combination tasks and never loaded from
/// disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClassKey {
    /// A real structural class, loaded from a per-class reconstruction.
    Structural(StructuralClass),
    /// The class-frequency-weighted combination of all real classes.
    Mixture,
    /// The blend of each site's own class with [`ClassKey::Mixture`].
    Final,
}

impl ClassKey {
    pub const fn tag(self) -> &'static str {
        match self {
            ClassKey::Structural(class) => class.tag(),
            ClassKey::Mixture => "mix",
            ClassKey::Final => "final",
        }
    }
}

impl From<StructuralClass> for ClassKey {
    fn from(class: StructuralClass) -> Self {
        ClassKey::Structural(class)
    }
}

impl fmt::Display for ClassKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_distinct_classes_with_distinct_tags() {
        let mut tags: Vec<&str> = StructuralClass::ALL.iter().map(|c| c.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 6);
    }

    #[test]
    fn tags_round_trip_through_from_tag() {
        for class in StructuralClass::ALL {
            assert_eq!(StructuralClass::from_tag(class.tag()), Some(class));
        }
        assert_eq!(StructuralClass::from_tag("xx"), None);
    }

    #[test]
    fn log_labels_encode_structure_then_burial() {
        let buried_strand = StructuralClass::new(Burial::Buried, SecondaryStructure::Strand);
        assert_eq!(buried_strand.log_label(), "E-bur");
        assert_eq!(buried_strand.tag(), "be");

        let exposed_helix = StructuralClass::new(Burial::Exposed, SecondaryStructure::Helix);
        assert_eq!(exposed_helix.log_label(), "H-exp");
        assert_eq!(exposed_helix.tag(), "eh");
    }

    #[test]
    fn pseudo_class_tags_never_collide_with_real_tags() {
        for class in StructuralClass::ALL {
            assert_ne!(class.tag(), ClassKey::Mixture.tag());
            assert_ne!(class.tag(), ClassKey::Final.tag());
        }
    }
}
