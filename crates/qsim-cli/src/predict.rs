//! Mock quantum ML predictions over a list of market features.
//!
//! Inputs are scaled by their largest magnitude into [-1, 1]; the prediction
//! is a fixed rule over the mean or spread of the scaled values. Nothing is
//! trained. `jitter` in [0, 1) perturbs the reported confidence of the rules
//! that have no closed-form confidence.

use clap::ValueEnum;
use serde::{Serialize, Serializer};

/// Added to the largest magnitude so an all-zero input scales to zeros.
const SCALE_EPSILON: f64 = 1e-10;

/// Population standard deviation above which `qsvm` reports high volatility.
const VOLATILITY_THRESHOLD: f64 = 0.3;

/// Reported feature-map depth is capped here.
const MAX_CIRCUIT_DEPTH: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Variational quantum classifier: direction of the mean.
    #[default]
    Vqc,
    /// Quantum support vector machine: volatility from the spread.
    Qsvm,
    /// Quantum approximate optimization: the scaled mean itself.
    Qaoa,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Vqc => "vqc",
            Self::Qsvm => "qsvm",
            Self::Qaoa => "qaoa",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction {
    Bullish,
    Bearish,
    HighVolatility,
    LowVolatility,
    OptimalValue(f64),
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => f.write_str("bullish"),
            Self::Bearish => f.write_str("bearish"),
            Self::HighVolatility => f.write_str("high_volatility"),
            Self::LowVolatility => f.write_str("low_volatility"),
            Self::OptimalValue(v) => write!(f, "optimal_value: {v:.4}"),
        }
    }
}

impl Serialize for Prediction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Scale `data` by its largest magnitude.
pub fn normalize(data: &[f64]) -> Vec<f64> {
    let peak = data.iter().fold(0.0_f64, |m, x| m.max(x.abs())) + SCALE_EPSILON;
    data.iter().map(|x| x / peak).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Depth of the feature-map circuit for `features` inputs.
pub fn circuit_depth(features: usize) -> usize {
    features.saturating_mul(2).min(MAX_CIRCUIT_DEPTH)
}

/// Apply `algorithm` to `data`. Returns the prediction and its confidence.
pub fn predict(data: &[f64], algorithm: Algorithm, jitter: f64) -> (Prediction, f64) {
    let scaled = normalize(data);
    let m = mean(&scaled);
    match algorithm {
        Algorithm::Vqc => {
            let p = if m > 0.0 { Prediction::Bullish } else { Prediction::Bearish };
            (p, m.abs() * 0.8 + 0.2)
        }
        Algorithm::Qsvm => {
            let p = if std_dev(&scaled) > VOLATILITY_THRESHOLD {
                Prediction::HighVolatility
            } else {
                Prediction::LowVolatility
            };
            (p, 0.7 + jitter * 0.25)
        }
        Algorithm::Qaoa => (Prediction::OptimalValue(m), 0.75 + jitter * 0.2),
    }
}
