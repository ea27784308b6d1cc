use crate::core::models::class::StructuralClass;
use crate::core::models::params::{ClassParameterSet, ClassParams, ParameterError};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Line prefix carrying the fit's log likelihood (value is the 6th token).
const LOG_LIKELIHOOD_PREFIX: &str = ". Final log";
/// Line prefix carrying the confidence (value is the 3rd token).
const CONFIDENCE_PREFIX: &str = "Conf =";
/// Line prefix carrying the final rate (value is the 4th token).
const FINAL_RATE_PREFIX: &str = "final rate ==";

/// Represents errors raised while parsing a structure-partitioned fit log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Line {line}: '{label}' line is too short")]
    TruncatedLine { line: usize, label: String },

    #[error("Line {line}: invalid number '{value}' in '{label}' line")]
    InvalidNumber {
        line: usize,
        label: String,
        value: String,
    },

    #[error("Log ended without a '{0}' line")]
    MissingScalar(&'static str),

    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

fn parse_token(
    tokens: &[&str],
    index: usize,
    line: usize,
    label: &str,
) -> Result<f64, LogError> {
    let token = tokens.get(index).ok_or_else(|| LogError::TruncatedLine {
        line,
        label: label.to_string(),
    })?;
    // Some producers terminate the value with punctuation (e.g. "0.95;").
    let trimmed = token.trim_end_matches(|c: char| !c.is_ascii_digit());
    trimmed.parse().map_err(|_| LogError::InvalidNumber {
        line,
        label: label.to_string(),
        value: (*token).to_string(),
    })
}

/// Parses a fit log into a validated [`ClassParameterSet`].
///
/// The recognized line prefixes form a closed set: one label per structural
/// class (each carrying that class's rate scaler and population fraction) and
/// three scalar markers for the log likelihood, the confidence, and the final
/// rate. Unrecognized lines are ignored. The returned set has already passed
/// the fraction-sum invariant and carries rate scalers normalized to the
/// final rate.
///
/// # Errors
///
/// Returns [`LogError::MissingScalar`] if any of the three global scalars
/// never appears, [`LogError::TruncatedLine`]/[`LogError::InvalidNumber`] for
/// malformed recognized lines, and [`LogError::Parameter`] if the assembled
/// values violate a [`ClassParameterSet`] invariant.
pub fn read_from(reader: &mut impl BufRead) -> Result<ClassParameterSet, LogError> {
    let mut classes: BTreeMap<StructuralClass, ClassParams> = BTreeMap::new();
    let mut log_likelihood = None;
    let mut confidence = None;
    let mut final_rate = None;

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;

        if line.starts_with(LOG_LIKELIHOOD_PREFIX) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            log_likelihood = Some(parse_token(&tokens, 5, line_num, LOG_LIKELIHOOD_PREFIX)?);
            continue;
        }
        if line.starts_with(CONFIDENCE_PREFIX) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            confidence = Some(parse_token(&tokens, 2, line_num, CONFIDENCE_PREFIX)?);
            continue;
        }
        if line.starts_with(FINAL_RATE_PREFIX) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            final_rate = Some(parse_token(&tokens, 3, line_num, FINAL_RATE_PREFIX)?);
            continue;
        }

        if let Some(class) = StructuralClass::ALL
            .into_iter()
            .find(|c| line.starts_with(c.log_label()))
        {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let rate_scaler = parse_token(&tokens, 1, line_num, class.log_label())?;
            let class_fraction = parse_token(&tokens, 2, line_num, class.log_label())?;
            classes.insert(
                class,
                ClassParams {
                    rate_scaler,
                    class_fraction,
                },
            );
        }
    }

    let log_likelihood =
        log_likelihood.ok_or(LogError::MissingScalar(LOG_LIKELIHOOD_PREFIX))?;
    let confidence = confidence.ok_or(LogError::MissingScalar(CONFIDENCE_PREFIX))?;
    let final_rate = final_rate.ok_or(LogError::MissingScalar(FINAL_RATE_PREFIX))?;

    Ok(ClassParameterSet::new(
        classes,
        log_likelihood,
        confidence,
        final_rate,
    )?)
}

/// Reads a fit log from a file path.
pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ClassParameterSet, LogError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::class::{Burial, SecondaryStructure};

    const FULL_LOG: &str = "\
. Some preamble line that is ignored
. Final log likelihood value = -1234.5
H-bur 0.40 0.15
E-bur 0.50 0.20
O-bur 0.30 0.15
H-exp 0.60 0.20
E-exp 0.70 0.10
O-exp 0.20 0.20
Conf = 0.95;
final rate == 0.25
";

    fn parse(text: &str) -> Result<ClassParameterSet, LogError> {
        read_from(&mut text.as_bytes())
    }

    #[test]
    fn full_log_parses_into_normalized_parameters() {
        let params = parse(FULL_LOG).unwrap();

        assert_eq!(params.log_likelihood(), -1234.5);
        assert_eq!(params.confidence(), 0.95);
        assert_eq!(params.final_rate(), 0.25);
        assert_eq!(params.len(), 6);

        let buried_helix = StructuralClass::new(Burial::Buried, SecondaryStructure::Helix);
        let entry = params.params(buried_helix).unwrap();
        assert!((entry.rate_scaler - 0.40 / 0.25).abs() < 1e-12);
        assert!((entry.class_fraction - 0.15).abs() < 1e-12);
    }

    #[test]
    fn confidence_value_may_carry_trailing_punctuation() {
        let params = parse(FULL_LOG).unwrap();
        assert_eq!(params.confidence(), 0.95);
    }

    #[test]
    fn missing_log_likelihood_is_reported() {
        let text = FULL_LOG.replace(". Final log likelihood value = -1234.5\n", "");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, LogError::MissingScalar(LOG_LIKELIHOOD_PREFIX)));
    }

    #[test]
    fn missing_final_rate_is_reported() {
        let text = FULL_LOG.replace("final rate == 0.25\n", "");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, LogError::MissingScalar(FINAL_RATE_PREFIX)));
    }

    #[test]
    fn missing_confidence_is_reported() {
        let text = FULL_LOG.replace("Conf = 0.95;\n", "");
        let err = parse(&text).unwrap_err();
        assert!(matches!(err, LogError::MissingScalar(CONFIDENCE_PREFIX)));
    }

    #[test]
    fn fraction_sum_violation_fails_instead_of_normalizing() {
        let text = FULL_LOG.replace("O-exp 0.20 0.20", "O-exp 0.20 0.10");
        let err = parse(&text).unwrap_err();
        assert!(matches!(
            err,
            LogError::Parameter(ParameterError::FractionSum { .. })
        ));
    }

    #[test]
    fn unparseable_class_value_is_reported_with_line() {
        let text = FULL_LOG.replace("E-exp 0.70 0.10", "E-exp seventy 0.10");
        match parse(&text).unwrap_err() {
            LogError::InvalidNumber { line, label, value } => {
                assert_eq!(line, 7);
                assert_eq!(label, "E-exp");
                assert_eq!(value, "seventy");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_class_line_is_reported() {
        let text = FULL_LOG.replace("H-exp 0.60 0.20", "H-exp 0.60");
        assert!(matches!(
            parse(&text).unwrap_err(),
            LogError::TruncatedLine { line: 6, .. }
        ));
    }
}
