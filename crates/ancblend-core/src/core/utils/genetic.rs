use phf::{Map, phf_map};
use std::collections::BTreeSet;

/// The standard genetic code. Stop codons translate to `*`.
static GENETIC_CODE: Map<&'static str, char> = phf_map! {
    "ATA" => 'I', "ATC" => 'I', "ATT" => 'I', "ATG" => 'M',
    "ACA" => 'T', "ACC" => 'T', "ACG" => 'T', "ACT" => 'T',
    "AAC" => 'N', "AAT" => 'N', "AAA" => 'K', "AAG" => 'K',
    "AGC" => 'S', "AGT" => 'S', "AGA" => 'R', "AGG" => 'R',
    "CTA" => 'L', "CTC" => 'L', "CTG" => 'L', "CTT" => 'L',
    "CCA" => 'P', "CCC" => 'P', "CCG" => 'P', "CCT" => 'P',
    "CAC" => 'H', "CAT" => 'H', "CAA" => 'Q', "CAG" => 'Q',
    "CGA" => 'R', "CGC" => 'R', "CGG" => 'R', "CGT" => 'R',
    "GTA" => 'V', "GTC" => 'V', "GTG" => 'V', "GTT" => 'V',
    "GCA" => 'A', "GCC" => 'A', "GCG" => 'A', "GCT" => 'A',
    "GAC" => 'D', "GAT" => 'D', "GAA" => 'E', "GAG" => 'E',
    "GGA" => 'G', "GGC" => 'G', "GGG" => 'G', "GGT" => 'G',
    "TCA" => 'S', "TCC" => 'S', "TCG" => 'S', "TCT" => 'S',
    "TTC" => 'F', "TTT" => 'F', "TTA" => 'L', "TTG" => 'L',
    "TAC" => 'Y', "TAT" => 'Y', "TAA" => '*', "TAG" => '*',
    "TGC" => 'C', "TGT" => 'C', "TGA" => '*', "TGG" => 'W',
};

/// Default nucleotide alphabet for neighbor enumeration.
pub const DNA_ALPHABET: [char; 4] = ['A', 'T', 'G', 'C'];

/// Translates a nucleotide sequence codon-by-codon.
///
/// Unknown codons (ambiguity codes, gaps) become `X`; a trailing partial codon
/// is dropped.
pub fn translate(sequence: &str) -> String {
    let nucleotides: Vec<char> = sequence.chars().collect();
    nucleotides
        .chunks_exact(3)
        .map(|codon| {
            let codon: String = codon.iter().collect();
            GENETIC_CODE.get(codon.as_str()).copied().unwrap_or('X')
        })
        .collect()
}

/// Enumerates every sequence within `max_mutations` substitutions of `seq`
/// over the given alphabet, the input itself included.
///
/// The result is deduplicated and lexicographically ordered, so downstream
/// consumers (e.g. unique-translation listings) are deterministic.
pub fn neighbors(seq: &str, max_mutations: usize, alphabet: &[char]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    found.insert(seq.to_string());

    let mut frontier: Vec<Vec<char>> = vec![seq.chars().collect()];
    for _ in 0..max_mutations {
        let mut next_frontier = Vec::new();
        for current in frontier {
            for site in 0..current.len() {
                for &state in alphabet {
                    if state == current[site] {
                        continue;
                    }
                    let mut mutated = current.clone();
                    mutated[site] = state;
                    let as_string: String = mutated.iter().collect();
                    if found.insert(as_string) {
                        next_frontier.push(mutated);
                    }
                }
            }
        }
        frontier = next_frontier;
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_standard_codons() {
        assert_eq!(translate("ATGAAACGT"), "MKR");
    }

    #[test]
    fn stop_codons_translate_to_asterisk() {
        assert_eq!(translate("TAA"), "*");
        assert_eq!(translate("ATGTGA"), "M*");
    }

    #[test]
    fn unknown_codons_translate_to_x() {
        assert_eq!(translate("AT-GGG"), "XG");
        assert_eq!(translate("NNNATG"), "XM");
    }

    #[test]
    fn partial_trailing_codon_is_dropped() {
        assert_eq!(translate("ATGAA"), "M");
        assert_eq!(translate(""), "");
    }

    #[test]
    fn zero_mutations_yields_only_the_input() {
        let set = neighbors("ATG", 0, &DNA_ALPHABET);
        assert_eq!(set.len(), 1);
        assert!(set.contains("ATG"));
    }

    #[test]
    fn single_mutation_neighborhood_has_expected_size() {
        // 3 sites x 3 alternative states + the input itself.
        let set = neighbors("ATG", 1, &DNA_ALPHABET);
        assert_eq!(set.len(), 10);
        assert!(set.contains("TTG"));
        assert!(set.contains("ATC"));
    }

    #[test]
    fn double_mutation_neighborhood_is_deduplicated() {
        // Distinct sequences within Hamming distance 2 of a 2-site sequence
        // over a 4-letter alphabet: 1 + 2*3 + 3*3 = 16 (the full space).
        let set = neighbors("AT", 2, &DNA_ALPHABET);
        assert_eq!(set.len(), 16);
    }
}
