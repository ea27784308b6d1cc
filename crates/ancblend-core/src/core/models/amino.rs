use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The 20 canonical amino acids, ordered by their one-letter code.
///
/// The discriminant order (`A C D E F G H I K L M N P Q R S T V W Y`) is the
/// column order of every probability matrix in the pipeline, and it doubles as
/// the deterministic tie-break when two residues carry the same posterior
/// probability in a ranked listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum AminoAcid {
    Ala,
    Cys,
    Asp,
    Glu,
    Phe,
    Gly,
    His,
    Ile,
    Lys,
    Leu,
    Met,
    Asn,
    Pro,
    Gln,
    Arg,
    Ser,
    Thr,
    Val,
    Trp,
    Tyr,
}

/// Number of canonical amino acids.
pub const ALPHABET_SIZE: usize = 20;

impl AminoAcid {
    /// All residues in column order.
    pub const ALL: [AminoAcid; ALPHABET_SIZE] = [
        AminoAcid::Ala,
        AminoAcid::Cys,
        AminoAcid::Asp,
        AminoAcid::Glu,
        AminoAcid::Phe,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Lys,
        AminoAcid::Leu,
        AminoAcid::Met,
        AminoAcid::Asn,
        AminoAcid::Pro,
        AminoAcid::Gln,
        AminoAcid::Arg,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Val,
        AminoAcid::Trp,
        AminoAcid::Tyr,
    ];

    /// The residue's matrix column index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// One-letter code.
    pub const fn code(self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Cys => 'C',
            AminoAcid::Asp => 'D',
            AminoAcid::Glu => 'E',
            AminoAcid::Phe => 'F',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Lys => 'K',
            AminoAcid::Leu => 'L',
            AminoAcid::Met => 'M',
            AminoAcid::Asn => 'N',
            AminoAcid::Pro => 'P',
            AminoAcid::Gln => 'Q',
            AminoAcid::Arg => 'R',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Val => 'V',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
        }
    }

    /// Parses a one-letter code.
    pub const fn from_code(code: char) -> Option<AminoAcid> {
        Some(match code {
            'A' => AminoAcid::Ala,
            'C' => AminoAcid::Cys,
            'D' => AminoAcid::Asp,
            'E' => AminoAcid::Glu,
            'F' => AminoAcid::Phe,
            'G' => AminoAcid::Gly,
            'H' => AminoAcid::His,
            'I' => AminoAcid::Ile,
            'K' => AminoAcid::Lys,
            'L' => AminoAcid::Leu,
            'M' => AminoAcid::Met,
            'N' => AminoAcid::Asn,
            'P' => AminoAcid::Pro,
            'Q' => AminoAcid::Gln,
            'R' => AminoAcid::Arg,
            'S' => AminoAcid::Ser,
            'T' => AminoAcid::Thr,
            'V' => AminoAcid::Val,
            'W' => AminoAcid::Trp,
            'Y' => AminoAcid::Tyr,
            _ => return None,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown amino-acid symbol '{0}'")]
pub struct UnknownResidueError(pub String);

impl FromStr for AminoAcid {
    type Err = UnknownResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                AminoAcid::from_code(c).ok_or_else(|| UnknownResidueError(s.to_string()))
            }
            _ => Err(UnknownResidueError(s.to_string())),
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_ordered_by_one_letter_code() {
        let codes: Vec<char> = AminoAcid::ALL.iter().map(|aa| aa.code()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
        assert_eq!(codes.len(), ALPHABET_SIZE);
    }

    #[test]
    fn index_matches_position_in_alphabet() {
        for (i, aa) in AminoAcid::ALL.iter().enumerate() {
            assert_eq!(aa.index(), i);
        }
    }

    #[test]
    fn code_round_trips_through_from_code() {
        for aa in AminoAcid::ALL {
            assert_eq!(AminoAcid::from_code(aa.code()), Some(aa));
        }
    }

    #[test]
    fn from_str_accepts_single_letters_only() {
        assert_eq!("W".parse::<AminoAcid>().unwrap(), AminoAcid::Trp);
        assert!("".parse::<AminoAcid>().is_err());
        assert!("AG".parse::<AminoAcid>().is_err());
        assert!("B".parse::<AminoAcid>().is_err());
    }
}
