use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const GR_PREFIX: &str = "#=GR";
const SS_TAG: &str = "SS_cons";
const SA_TAG: &str = "SA_cons";

/// Consensus structural annotations of an alignment: one secondary-structure
/// symbol and one solvent-accessibility symbol per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralAnnotations {
    pub secondary_structure: String,
    pub accessibility: String,
}

/// Represents errors raised while extracting `#=GR` annotations from an
/// alignment file.
#[derive(Debug, Error)]
pub enum StockholmError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Line {line}: '#=GR' annotation line is missing its value")]
    TruncatedLine { line: usize },

    #[error("No '#=GR {0}' annotation found")]
    MissingAnnotation(&'static str),

    #[error("'#=GR {0}' annotation appears more than once")]
    DuplicateAnnotation(&'static str),
}

/// Extracts the consensus secondary-structure (`SS_cons`) and solvent-
/// accessibility (`SA_cons`) annotation strings from an alignment file.
///
/// Exactly one of each must be present; everything else in the file is
/// ignored. Length agreement between the two strings is the site-class map's
/// concern, not this reader's.
pub fn read_from(reader: &mut impl BufRead) -> Result<StructuralAnnotations, StockholmError> {
    let mut secondary_structure: Option<String> = None;
    let mut accessibility: Option<String> = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if !line.starts_with(GR_PREFIX) {
            continue;
        }

        let mut tokens = line.split_whitespace();
        tokens.next();
        let Some(tag) = tokens.next() else {
            continue;
        };

        let slot = match tag {
            SS_TAG => &mut secondary_structure,
            SA_TAG => &mut accessibility,
            _ => continue,
        };
        let which = if tag == SS_TAG { SS_TAG } else { SA_TAG };

        let value = tokens
            .next()
            .ok_or(StockholmError::TruncatedLine { line: line_num + 1 })?;
        if slot.is_some() {
            return Err(StockholmError::DuplicateAnnotation(which));
        }
        *slot = Some(value.to_string());
    }

    Ok(StructuralAnnotations {
        secondary_structure: secondary_structure
            .ok_or(StockholmError::MissingAnnotation(SS_TAG))?,
        accessibility: accessibility.ok_or(StockholmError::MissingAnnotation(SA_TAG))?,
    })
}

/// Reads structural annotations from a file path.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<StructuralAnnotations, StockholmError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader)
}
