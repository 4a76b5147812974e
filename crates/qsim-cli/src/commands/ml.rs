//! `qsim ml` — mock quantum ML prediction over a feature list.

use anyhow::{Result, bail};

use super::{Session, parse_values};
use crate::predict::Algorithm;

pub fn run(session: &mut Session, values: &str, algorithm: Algorithm) -> Result<()> {
    let data = parse_values(values)?;
    if data.is_empty() {
        bail!("--values needs at least one number");
    }
    if let Some(bad) = data.iter().find(|x| !x.is_finite()) {
        bail!("feature value {bad} is not finite");
    }

    let report = session.engine.predict(&data, algorithm);

    session.emit(&report, || {
        println!("Algorithm:     {}", report.algorithm);
        println!("Prediction:    {}", report.prediction);
        println!("Confidence:    {:.2}%", report.confidence * 100.0);
        println!(
            "Features:      {} (circuit depth {})",
            report.input_features, report.circuit_depth
        );
        println!(
            "Time:          {:.3}ms ({})",
            report.processing_time_ms, report.backend
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineConfig, EngineStats};
    use qsim_core::SeededBitSource;

    fn session() -> Session {
        Session {
            engine: Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(1))),
            stats: EngineStats::default(),
            json: true,
        }
    }

    #[test]
    fn test_run_each_algorithm() {
        let mut s = session();
        for algorithm in [Algorithm::Vqc, Algorithm::Qsvm, Algorithm::Qaoa] {
            run(&mut s, "0.5, -0.2, 0.9", algorithm).unwrap();
        }
        assert_eq!(s.stats, EngineStats::default());
    }

    #[test]
    fn test_empty_values_rejected() {
        let err = run(&mut session(), "", Algorithm::Vqc).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(run(&mut session(), "1,inf", Algorithm::Qsvm).is_err());
        assert!(run(&mut session(), "NaN", Algorithm::Qaoa).is_err());
    }
}
