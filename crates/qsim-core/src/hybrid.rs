//! Hybrid classical/quantum combination.

use serde::Serialize;

use crate::measurement::MeasurementOutcome;

/// A classical scalar joined with a measurement result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridResult {
    pub classical_value: f64,
    pub measurement: MeasurementOutcome,
    /// `classical_value * measurement.distinct_outcomes()`.
    pub combined: f64,
}

/// Scale the classical value by the number of distinct observed outcomes.
/// An empty measurement gives `combined == 0`.
pub fn combine(classical_value: f64, measurement: MeasurementOutcome) -> HybridResult {
    let combined = classical_value * measurement.distinct_outcomes() as f64;
    HybridResult {
        classical_value,
        measurement,
        combined,
    }
}

/// Classical preprocessing step: sum of the inputs (0.0 when empty).
pub fn classical_sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn outcome(pairs: &[(&str, u64)]) -> MeasurementOutcome {
        let counts = pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        MeasurementOutcome::from_counts(2, counts).unwrap()
    }

    #[test]
    fn test_combine_scales_by_distinct_outcomes() {
        let r = combine(5.0, outcome(&[("00", 3), ("01", 7)]));
        assert_eq!(r.combined, 10.0);
        assert_eq!(r.classical_value, 5.0);
        assert_eq!(r.measurement.shots, 10);
    }

    #[test]
    fn test_combine_empty_measurement() {
        let empty = MeasurementOutcome::from_counts(2, BTreeMap::new()).unwrap();
        assert_eq!(combine(42.0, empty).combined, 0.0);
    }

    #[test]
    fn test_combine_negative_classical() {
        let r = combine(-1.5, outcome(&[("00", 1), ("01", 1), ("11", 1)]));
        assert_eq!(r.combined, -4.5);
    }

    #[test]
    fn test_classical_sum() {
        assert_eq!(classical_sum(&[]), 0.0);
        assert_eq!(classical_sum(&[1.0, 2.5, -0.5]), 3.0);
    }
}
