use super::class::StructuralClass;
use std::collections::BTreeMap;
use thiserror::Error;

/// Lower bound on the class-fraction sum (tolerance for upstream rounding).
pub const FRACTION_SUM_MIN: f64 = 0.99;
/// Upper bound on the class-fraction sum.
pub const FRACTION_SUM_MAX: f64 = 1.01;

/// Fitted parameters of one structural class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassParams {
    /// Branch-length scaling factor of this class's tree, normalized to the
    /// global final rate at construction time.
    pub rate_scaler: f64,
    /// Estimated population fraction of sites belonging to this class.
    pub class_fraction: f64,
}

/// Represents errors raised while assembling a [`ClassParameterSet`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParameterError {
    /// The class fractions must describe a (rounded) partition of the sites.
    #[error(
        "Class fractions sum to {sum}, outside [{FRACTION_SUM_MIN}, {FRACTION_SUM_MAX}]"
    )]
    FractionSum { sum: f64 },

    /// The final rate interpolates between a site's own class and the
    /// mixture, and normalizes the rate scalers; it must lie strictly
    /// inside (0, 1).
    #[error("Final rate {value} is not in the open interval (0, 1)")]
    FinalRateOutOfRange { value: f64 },

    /// A parameter set without any class carries no information.
    #[error("No class parameters were provided")]
    Empty,
}

/// The complete parameter bundle of one structure-partitioned fit.
///
/// Built once from a fit log and immutable afterwards; every pipeline stage
/// takes it by shared reference. Construction normalizes each class's rate
/// scaler by the final rate exactly once — re-parsing a log always starts from
/// raw values, so double normalization cannot occur.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassParameterSet {
    classes: BTreeMap<StructuralClass, ClassParams>,
    log_likelihood: f64,
    confidence: f64,
    final_rate: f64,
}

impl ClassParameterSet {
    /// Validates the raw per-class values and assembles the set.
    ///
    /// `raw_classes` carries *un-normalized* rate scalers as they appear in
    /// the fit log; this constructor divides each by `final_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Empty`] if `raw_classes` is empty,
    /// [`ParameterError::FinalRateOutOfRange`] if `final_rate` is outside
    /// (0, 1), and [`ParameterError::FractionSum`] if the class fractions do
    /// not sum to 1 within tolerance. The fraction check never normalizes
    /// silently: inconsistent fits must fail loudly.
    pub fn new(
        raw_classes: BTreeMap<StructuralClass, ClassParams>,
        log_likelihood: f64,
        confidence: f64,
        final_rate: f64,
    ) -> Result<Self, ParameterError> {
        if raw_classes.is_empty() {
            return Err(ParameterError::Empty);
        }
        if !(final_rate > 0.0 && final_rate < 1.0) {
            return Err(ParameterError::FinalRateOutOfRange { value: final_rate });
        }

        let sum: f64 = raw_classes.values().map(|p| p.class_fraction).sum();
        if !(FRACTION_SUM_MIN..=FRACTION_SUM_MAX).contains(&sum) {
            return Err(ParameterError::FractionSum { sum });
        }

        let classes = raw_classes
            .into_iter()
            .map(|(class, params)| {
                (
                    class,
                    ClassParams {
                        rate_scaler: params.rate_scaler / final_rate,
                        class_fraction: params.class_fraction,
                    },
                )
            })
            .collect();

        Ok(Self {
            classes,
            log_likelihood,
            confidence,
            final_rate,
        })
    }

    /// The classes of this fit, in deterministic (tag) order.
    pub fn classes(&self) -> impl Iterator<Item = (StructuralClass, &ClassParams)> {
        self.classes.iter().map(|(&class, params)| (class, params))
    }

    pub fn params(&self, class: StructuralClass) -> Option<&ClassParams> {
        self.classes.get(&class)
    }

    pub fn contains(&self, class: StructuralClass) -> bool {
        self.classes.contains_key(&class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Global interpolation weight between a site's own class and the
    /// population mixture.
    pub fn final_rate(&self) -> f64 {
        self.final_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::class::{Burial, SecondaryStructure};

    fn raw(pairs: &[(StructuralClass, f64, f64)]) -> BTreeMap<StructuralClass, ClassParams> {
        pairs
            .iter()
            .map(|&(class, rate_scaler, class_fraction)| {
                (
                    class,
                    ClassParams {
                        rate_scaler,
                        class_fraction,
                    },
                )
            })
            .collect()
    }

    fn two_classes() -> [StructuralClass; 2] {
        [
            StructuralClass::new(Burial::Buried, SecondaryStructure::Helix),
            StructuralClass::new(Burial::Exposed, SecondaryStructure::Strand),
        ]
    }

    #[test]
    fn rate_scalers_are_normalized_to_the_final_rate_once() {
        let [a, b] = two_classes();
        let set =
            ClassParameterSet::new(raw(&[(a, 1.2, 0.6), (b, 0.8, 0.4)]), -150.0, 0.9, 0.5)
                .unwrap();
        assert!((set.params(a).unwrap().rate_scaler - 2.4).abs() < 1e-12);
        assert!((set.params(b).unwrap().rate_scaler - 1.6).abs() < 1e-12);
        assert_eq!(set.final_rate(), 0.5);
    }

    #[test]
    fn fraction_sum_below_tolerance_is_rejected() {
        let [a, b] = two_classes();
        let err = ClassParameterSet::new(raw(&[(a, 1.0, 0.5), (b, 1.0, 0.48)]), 0.0, 0.9, 0.5)
            .unwrap_err();
        assert!(matches!(err, ParameterError::FractionSum { .. }));
    }

    #[test]
    fn fraction_sum_above_tolerance_is_rejected() {
        let [a, b] = two_classes();
        let err = ClassParameterSet::new(raw(&[(a, 1.0, 0.6), (b, 1.0, 0.42)]), 0.0, 0.9, 0.5)
            .unwrap_err();
        assert!(matches!(err, ParameterError::FractionSum { .. }));
    }

    #[test]
    fn fraction_sum_within_rounding_tolerance_is_accepted() {
        let [a, b] = two_classes();
        assert!(
            ClassParameterSet::new(raw(&[(a, 1.0, 0.6), (b, 1.0, 0.395)]), 0.0, 0.9, 0.5)
                .is_ok()
        );
    }

    #[test]
    fn final_rate_must_lie_strictly_inside_unit_interval() {
        let [a, b] = two_classes();
        for bad in [0.0, 1.0, -0.2, 1.5] {
            let err =
                ClassParameterSet::new(raw(&[(a, 1.0, 0.6), (b, 1.0, 0.4)]), 0.0, 0.9, bad)
                    .unwrap_err();
            assert!(matches!(err, ParameterError::FinalRateOutOfRange { .. }));
        }
    }

    #[test]
    fn empty_class_set_is_rejected() {
        let err = ClassParameterSet::new(BTreeMap::new(), 0.0, 0.9, 0.5).unwrap_err();
        assert!(matches!(err, ParameterError::Empty));
    }
}
