use crate::core::models::distribution::SiteDistribution;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Node identifier, matching the internal numbering of the tree the
/// reconstruction was run on.
pub type NodeId = u32;

/// Represents errors raised while reading a per-node probability table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: TableParseErrorKind,
    },
}

#[derive(Debug, Error)]
pub enum TableParseErrorKind {
    #[error("Missing site index")]
    MissingSiteIndex,
    #[error("Invalid site index '{0}'")]
    InvalidSiteIndex(String),
    #[error("Residue '{0}' has no probability token")]
    UnpairedResidue(String),
    #[error("Unknown amino-acid symbol '{0}'")]
    UnknownResidue(String),
    #[error("Invalid probability '{value}' for residue '{residue}'")]
    InvalidProbability { residue: String, value: String },
}

/// Reads one node's probability table.
///
/// One line per site: a 1-based site index followed by alternating
/// `(residue, probability)` tokens, sorted by the producer in descending
/// probability and already truncated below its reporting threshold. Residues
/// not listed default to probability 0. Line order is authoritative for site
/// order; the leading index is validated but not required to be consecutive.
///
/// # Errors
///
/// Returns [`TableError::Parse`] identifying the offending line for any
/// malformed token, and [`TableError::Io`] if reading fails.
pub fn read_from(reader: &mut impl BufRead) -> Result<Vec<SiteDistribution>, TableError> {
    let mut sites = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let index_token = tokens.next().ok_or(TableError::Parse {
            line: line_num,
            kind: TableParseErrorKind::MissingSiteIndex,
        })?;
        index_token.parse::<usize>().map_err(|_| TableError::Parse {
            line: line_num,
            kind: TableParseErrorKind::InvalidSiteIndex(index_token.to_string()),
        })?;

        let mut dist = SiteDistribution::zero();
        while let Some(residue_token) = tokens.next() {
            let prob_token = tokens.next().ok_or_else(|| TableError::Parse {
                line: line_num,
                kind: TableParseErrorKind::UnpairedResidue(residue_token.to_string()),
            })?;

            let residue = residue_token.parse().map_err(|_| TableError::Parse {
                line: line_num,
                kind: TableParseErrorKind::UnknownResidue(residue_token.to_string()),
            })?;
            let probability: f64 = prob_token.parse().map_err(|_| TableError::Parse {
                line: line_num,
                kind: TableParseErrorKind::InvalidProbability {
                    residue: residue_token.to_string(),
                    value: prob_token.to_string(),
                },
            })?;
            if probability < 0.0 || !probability.is_finite() {
                return Err(TableError::Parse {
                    line: line_num,
                    kind: TableParseErrorKind::InvalidProbability {
                        residue: residue_token.to_string(),
                        value: prob_token.to_string(),
                    },
                });
            }

            dist.set(residue, probability);
        }
        sites.push(dist);
    }

    Ok(sites)
}

/// Writes one node's distributions in the table format.
///
/// Each line carries the 1-based site index and the site's residues ranked by
/// descending probability (ties by ascending symbol), printed to three
/// decimals and truncated at the first zero entry.
pub fn write_to(
    sites: &[SiteDistribution],
    writer: &mut impl Write,
) -> Result<(), io::Error> {
    for (i, dist) in sites.iter().enumerate() {
        write!(writer, "{} ", i + 1)?;
        for (residue, probability) in dist.ranked() {
            write!(writer, " {} {:.3}", residue, probability)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Reads a probability table from a file path.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SiteDistribution>, TableError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader)
}

/// Writes a probability table to a file path.
pub fn write_to_path<P: AsRef<Path>>(
    sites: &[SiteDistribution],
    path: P,
) -> Result<(), io::Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(sites, &mut writer)?;
    writer.flush()
}

/// The table file name for a node (`node<N>.dat`).
pub fn node_file_name(node: NodeId) -> String {
    format!("node{node}.dat")
}

/// Extracts the node id from a `node<N>.dat` file name.
pub fn parse_node_file_name(name: &str) -> Option<NodeId> {
    name.strip_prefix("node")?
        .strip_suffix(".dat")?
        .parse()
        .ok()
}

/// Reads every `node<N>.dat` table in a class directory, keyed by node id.
///
/// Files not matching the node-table naming scheme are ignored. The returned
/// map iterates in ascending node order regardless of directory order.
pub fn read_class_dir<P: AsRef<Path>>(
    dir: P,
) -> Result<BTreeMap<NodeId, Vec<SiteDistribution>>, TableError> {
    let mut tables = BTreeMap::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if let Some(node) = parse_node_file_name(name) {
            tables.insert(node, read_from_path(entry.path())?);
        }
    }
    Ok(tables)
}
