//! Simulation facade: configuration, timing, and counters around the core.
//!
//! The [`Engine`] owns the backend configuration and the bit source. Run
//! counters live in [`EngineStats`], which callers pass into every operation,
//! so the engine itself holds no mutable state.

use std::time::{Duration, Instant};

use clap::ValueEnum;
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use qsim_core::{
    BitSource, Circuit, HybridResult, KeyMaterial, MeasurementOutcome, SimError,
    aggregate_parallel, classical_sum, combine, derive_key, entropy, pack, run_circuit,
};

use crate::clock::now_iso8601;
use crate::predict::{self, Algorithm, Prediction};

/// Simulated execution backend. Only affects reported metadata and the
/// simulated speedup applied to timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    NvidiaGpu,
    Cpu,
    Cloud,
}

impl Backend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::NvidiaGpu => "nvidia-gpu",
            Self::Cpu => "cpu",
            Self::Cloud => "cloud",
        }
    }

    pub fn gpu_accelerated(&self) -> bool {
        self.label().contains("gpu")
    }

    pub fn cuquantum(&self) -> bool {
        self.label().contains("nvidia")
    }

    /// Factor applied to measured wall time for a given operation kind.
    fn time_scale(&self, op: Op) -> f64 {
        if !self.cuquantum() {
            return 1.0;
        }
        match op {
            Op::Random => 0.1,
            Op::Circuit => 0.15,
            Op::Predict => 0.2,
        }
    }

    fn speedup_factor(&self) -> u32 {
        if self.cuquantum() { 10 } else { 2 }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Random,
    Circuit,
    Predict,
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: Backend,
    /// Register width used when a request does not name one.
    pub num_qubits: usize,
    /// Threads used to sample circuit shots; 1 samples inline.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::NvidiaGpu,
            num_qubits: 16,
            workers: 1,
        }
    }
}

/// Run counters, owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub circuits_executed: u64,
    pub total_random_bits: u64,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RandomReport {
    pub random_hex: String,
    pub random_bits: usize,
    pub entropy: f64,
    pub quantum_source: bool,
    pub source: &'static str,
    pub backend: Backend,
    pub generation_time_ms: f64,
    pub timestamp: String,
    pub circuit_depth: usize,
    pub gpu_accelerated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircuitReport {
    pub num_qubits: usize,
    pub circuit_depth: usize,
    pub shots: usize,
    pub measurement: MeasurementOutcome,
    pub backend: Backend,
    pub simulation_time_ms: f64,
    pub gpu_accelerated: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyReport {
    #[serde(flatten)]
    pub key: KeyMaterial,
    pub quantum_source: bool,
    pub backend: Backend,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HybridReport {
    pub classical_component: f64,
    pub quantum_component: CircuitReport,
    pub hybrid_value: f64,
    pub optimization: &'static str,
    pub speedup_factor: u32,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MlReport {
    pub algorithm: Algorithm,
    pub prediction: Prediction,
    pub confidence: f64,
    pub input_features: usize,
    pub circuit_depth: usize,
    pub quantum_advantage: bool,
    pub backend: Backend,
    pub processing_time_ms: f64,
    pub gpu_accelerated: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineStatistics {
    pub backend: Backend,
    pub circuits_executed: u64,
    pub total_random_bits: u64,
    pub gpu_accelerated: bool,
    pub cuda_available: bool,
    pub num_qubits_available: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Wall time of 10 × 256-bit random generations, seconds.
    pub random_generation_10x256bits: f64,
    /// Wall time of 5 × 10-qubit, 1000-shot circuits, seconds.
    pub circuit_simulation_5x10qubits: f64,
    /// Wall time of 10 predictions over 10 random features, seconds.
    pub ml_predictions_10x: f64,
    pub gpu_speedup: &'static str,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Facade over the measurement core.
pub struct Engine {
    config: EngineConfig,
    source: Box<dyn BitSource>,
}

impl Engine {
    pub fn new(config: EngineConfig, source: Box<dyn BitSource>) -> Self {
        debug!(
            "engine configured: backend={} qubits={} workers={} source={}",
            config.backend,
            config.num_qubits,
            config.workers,
            source.name()
        );
        Self { config, source }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn scaled_ms(&self, elapsed: Duration, op: Op) -> f64 {
        elapsed.as_secs_f64() * 1000.0 * self.config.backend.time_scale(op)
    }

    /// Multi-line startup banner describing the configuration.
    pub fn banner(&self) -> String {
        let backend = self.config.backend;
        let rows = [
            format!("Backend: {backend}"),
            format!("Qubits: {}", self.config.num_qubits),
            format!(
                "GPU Acceleration: {}",
                if backend.gpu_accelerated() { "Enabled" } else { "Disabled" }
            ),
            format!(
                "cuQuantum: {}",
                if backend.cuquantum() { "Active" } else { "Inactive" }
            ),
            format!("Bit source: {}", self.source.name()),
        ];
        let width = 63;
        let mut out = String::new();
        out.push_str(&format!("╔{}╗\n", "═".repeat(width)));
        out.push_str(&format!("║{:^width$}║\n", "QSIM SIMULATED QUANTUM BACKEND"));
        out.push_str(&format!("╠{}╣\n", "═".repeat(width)));
        for row in rows {
            out.push_str(&format!("║  {:<w$}║\n", row, w = width - 2));
        }
        out.push_str(&format!("╚{}╝", "═".repeat(width)));
        out
    }

    /// Draw `num_bits` measured bits and report them packed, with entropy.
    pub fn generate_random(&self, stats: &mut EngineStats, num_bits: usize) -> RandomReport {
        let start = Instant::now();
        let bits = self.source.generate(num_bits);
        let encoding = pack(&bits);
        let h = entropy(&bits);
        let generation_time_ms = self.scaled_ms(start.elapsed(), Op::Random);

        stats.circuits_executed += 1;
        stats.total_random_bits += num_bits as u64;

        info!("random generated: {num_bits} bits in {generation_time_ms:.2}ms (H={h:.4})");

        RandomReport {
            random_hex: encoding.hex,
            random_bits: num_bits,
            entropy: h,
            quantum_source: true,
            source: self.source.name(),
            backend: self.config.backend,
            generation_time_ms,
            timestamp: now_iso8601(),
            // One Hadamard per register qubit used to prepare the draw.
            circuit_depth: num_bits.min(self.config.num_qubits),
            gpu_accelerated: self.config.backend.gpu_accelerated(),
        }
    }

    /// Sample a circuit and report its outcome distribution.
    pub fn simulate_circuit(
        &self,
        stats: &mut EngineStats,
        circuit: &Circuit,
    ) -> Result<CircuitReport, SimError> {
        let start = Instant::now();
        let measurement = if self.config.workers > 1 {
            circuit.validate()?;
            aggregate_parallel(
                self.source.as_ref(),
                circuit.num_qubits,
                circuit.shots,
                self.config.workers,
            )?
        } else {
            run_circuit(self.source.as_ref(), circuit)?
        };
        let simulation_time_ms = self.scaled_ms(start.elapsed(), Op::Circuit);

        stats.circuits_executed += 1;

        info!(
            "circuit simulated: {} qubits, {} shots, {} distinct outcomes in {simulation_time_ms:.2}ms",
            circuit.num_qubits,
            circuit.shots,
            measurement.distinct_outcomes()
        );

        Ok(CircuitReport {
            num_qubits: circuit.num_qubits,
            circuit_depth: circuit.depth(),
            shots: circuit.shots,
            measurement,
            backend: self.config.backend,
            simulation_time_ms,
            gpu_accelerated: self.config.backend.gpu_accelerated(),
            timestamp: now_iso8601(),
        })
    }

    /// Derive a key with the simplified two-basis protocol.
    pub fn generate_key(
        &self,
        stats: &mut EngineStats,
        key_size_bits: usize,
    ) -> Result<KeyReport, SimError> {
        let key = derive_key(self.source.as_ref(), key_size_bits)?;

        stats.circuits_executed += 1;
        stats.total_random_bits += key_size_bits as u64;

        info!(
            "key generated: {key_size_bits} bits, {} basis label(s) used",
            key.bases_used
        );

        Ok(KeyReport {
            key,
            quantum_source: true,
            backend: self.config.backend,
            timestamp: now_iso8601(),
        })
    }

    /// Sum the classical values, sample the circuit, and combine.
    pub fn hybrid(
        &self,
        stats: &mut EngineStats,
        values: &[f64],
        circuit: &Circuit,
    ) -> Result<HybridReport, SimError> {
        let classical = classical_sum(values);
        let quantum = self.simulate_circuit(stats, circuit)?;
        let HybridResult { combined, .. } = combine(classical, quantum.measurement.clone());

        info!("hybrid computation complete: classical={classical} combined={combined}");

        Ok(HybridReport {
            classical_component: classical,
            quantum_component: quantum,
            hybrid_value: combined,
            optimization: "quantum_enhanced",
            speedup_factor: self.config.backend.speedup_factor(),
            timestamp: now_iso8601(),
        })
    }

    /// Mock ML prediction over `data`. Does not touch the run counters.
    ///
    /// Confidence jitter for `qsvm` and `qaoa` is drawn from the engine's bit
    /// source, so a seeded source reproduces the whole report.
    pub fn predict(&self, data: &[f64], algorithm: Algorithm) -> MlReport {
        let start = Instant::now();
        let jitter = self.unit_sample();
        let (prediction, confidence) = predict::predict(data, algorithm, jitter);
        let processing_time_ms = self.scaled_ms(start.elapsed(), Op::Predict);

        info!(
            "ml prediction ({algorithm}): {prediction} (confidence {:.2}%)",
            confidence * 100.0
        );

        MlReport {
            algorithm,
            prediction,
            confidence,
            input_features: data.len(),
            circuit_depth: predict::circuit_depth(data.len()),
            quantum_advantage: true,
            backend: self.config.backend,
            processing_time_ms,
            gpu_accelerated: self.config.backend.gpu_accelerated(),
            timestamp: now_iso8601(),
        }
    }

    /// Uniform value in [0, 1) from 32 source bits.
    fn unit_sample(&self) -> f64 {
        let bits = self.source.generate(32);
        let word = bits
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, b)| acc | (u32::from(b) << i));
        f64::from(word) / 4_294_967_296.0
    }

    /// Snapshot of configuration and counters.
    pub fn statistics(&self, stats: &EngineStats) -> EngineStatistics {
        EngineStatistics {
            backend: self.config.backend,
            circuits_executed: stats.circuits_executed,
            total_random_bits: stats.total_random_bits,
            gpu_accelerated: self.config.backend.gpu_accelerated(),
            cuda_available: self.config.backend.cuquantum(),
            num_qubits_available: self.config.num_qubits,
        }
    }

    /// Time fixed batches of random generation, circuit sampling, and
    /// predictions.
    pub fn benchmark(&self, stats: &mut EngineStats) -> Result<BenchmarkReport, SimError> {
        let start = Instant::now();
        for _ in 0..10 {
            self.generate_random(stats, 256);
        }
        let random_time = start.elapsed().as_secs_f64();

        let circuit = Circuit::hadamard_layer(10, 10).with_shots(1000);
        let start = Instant::now();
        for _ in 0..5 {
            self.simulate_circuit(stats, &circuit)?;
        }
        let circuit_time = start.elapsed().as_secs_f64();

        let mut rng = rand::rng();
        let start = Instant::now();
        for _ in 0..10 {
            let features: Vec<f64> = (0..10).map(|_| rng.random::<f64>()).collect();
            self.predict(&features, Algorithm::Vqc);
        }
        let ml_time = start.elapsed().as_secs_f64();

        Ok(BenchmarkReport {
            random_generation_10x256bits: random_time,
            circuit_simulation_5x10qubits: circuit_time,
            ml_predictions_10x: ml_time,
            gpu_speedup: if self.config.backend.cuquantum() { "5-10x" } else { "N/A" },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_core::{SeededBitSource, ThreadRngSource};

    fn engine(backend: Backend) -> Engine {
        Engine::new(
            EngineConfig {
                backend,
                num_qubits: 16,
                workers: 1,
            },
            Box::new(ThreadRngSource),
        )
    }

    #[test]
    fn test_backend_flags() {
        assert!(Backend::NvidiaGpu.gpu_accelerated());
        assert!(Backend::NvidiaGpu.cuquantum());
        assert!(!Backend::Cpu.gpu_accelerated());
        assert!(!Backend::Cloud.cuquantum());
        assert_eq!(Backend::NvidiaGpu.to_string(), "nvidia-gpu");
    }

    #[test]
    fn test_generate_random_report() {
        let e = engine(Backend::Cpu);
        let mut stats = EngineStats::default();
        let r = e.generate_random(&mut stats, 256);
        assert_eq!(r.random_hex.len(), 64);
        assert_eq!(r.random_bits, 256);
        assert_eq!(r.circuit_depth, 16);
        assert!(!r.gpu_accelerated);
        assert_eq!(stats.circuits_executed, 1);
        assert_eq!(stats.total_random_bits, 256);
    }

    #[test]
    fn test_depth_capped_by_request() {
        let e = engine(Backend::NvidiaGpu);
        let r = e.generate_random(&mut EngineStats::default(), 5);
        assert_eq!(r.circuit_depth, 5);
        assert_eq!(r.random_hex.len(), 2);
    }

    #[test]
    fn test_simulate_circuit_report() {
        let e = engine(Backend::NvidiaGpu);
        let mut stats = EngineStats::default();
        let c = Circuit::hadamard_layer(4, 4).with_shots(500);
        let r = e.simulate_circuit(&mut stats, &c).unwrap();
        assert_eq!(r.shots, 500);
        assert_eq!(r.circuit_depth, 4);
        assert_eq!(r.measurement.shots, 500);
        assert_eq!(stats.circuits_executed, 1);
        assert_eq!(stats.total_random_bits, 0);
    }

    #[test]
    fn test_simulate_circuit_parallel_workers() {
        let e = Engine::new(
            EngineConfig {
                backend: Backend::Cpu,
                num_qubits: 16,
                workers: 4,
            },
            Box::new(ThreadRngSource),
        );
        let mut stats = EngineStats::default();
        let c = Circuit::hadamard_layer(4, 4).with_shots(1001);
        let r = e.simulate_circuit(&mut stats, &c).unwrap();
        assert_eq!(r.measurement.shots, 1001);
        assert!(r.measurement.counts.keys().all(|k| k.len() == 4));

        let bad = Circuit::new(2).with_gates(vec![qsim_core::Gate::X(5)]);
        assert!(e.simulate_circuit(&mut stats, &bad).is_err());
    }

    #[test]
    fn test_simulate_circuit_error_leaves_stats() {
        let e = engine(Backend::Cpu);
        let mut stats = EngineStats::default();
        let c = Circuit::new(4).with_shots(0);
        assert_eq!(
            e.simulate_circuit(&mut stats, &c).unwrap_err(),
            SimError::InvalidShotCount(0)
        );
        assert_eq!(stats, EngineStats::default());
    }

    #[test]
    fn test_generate_key_report() {
        let e = engine(Backend::Cpu);
        let mut stats = EngineStats::default();
        let r = e.generate_key(&mut stats, 256).unwrap();
        assert_eq!(r.key.key_hex.len(), 64);
        assert_eq!(stats.total_random_bits, 256);
        assert!(e.generate_key(&mut stats, 0).is_err());
    }

    #[test]
    fn test_hybrid_value() {
        let e = Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(4)));
        let mut stats = EngineStats::default();
        let c = Circuit::hadamard_layer(8, 4).with_shots(100);
        let r = e.hybrid(&mut stats, &[1.0, 2.0, 3.0], &c).unwrap();
        assert_eq!(r.classical_component, 6.0);
        let distinct = r.quantum_component.measurement.distinct_outcomes() as f64;
        assert_eq!(r.hybrid_value, 6.0 * distinct);
        assert_eq!(r.speedup_factor, 10);
    }

    #[test]
    fn test_predict_vqc_report() {
        let e = engine(Backend::NvidiaGpu);
        let r = e.predict(&[0.5, 0.3, 0.7, 0.2, 0.9, 0.4, 0.6, 0.1], Algorithm::Vqc);
        assert_eq!(r.prediction, Prediction::Bullish);
        assert_eq!(r.input_features, 8);
        assert_eq!(r.circuit_depth, 16);
        assert!(r.quantum_advantage);
        assert!(r.gpu_accelerated);
        assert!(r.confidence > 0.2 && r.confidence <= 1.0);
    }

    #[test]
    fn test_predict_jitter_bounds() {
        let e = engine(Backend::Cpu);
        for _ in 0..50 {
            let q = e.predict(&[1.0, -1.0], Algorithm::Qsvm);
            assert!((0.7..0.95).contains(&q.confidence), "{}", q.confidence);
            let a = e.predict(&[1.0, -1.0], Algorithm::Qaoa);
            assert!((0.75..0.95).contains(&a.confidence), "{}", a.confidence);
        }
    }

    #[test]
    fn test_predict_seeded_reproduces() {
        let a = Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(7)));
        let b = Engine::new(EngineConfig::default(), Box::new(SeededBitSource::new(7)));
        let data = [0.1, 0.9, 0.4];
        assert_eq!(
            a.predict(&data, Algorithm::Qsvm).confidence,
            b.predict(&data, Algorithm::Qsvm).confidence
        );
    }

    #[test]
    fn test_predict_report_serializes() {
        let e = engine(Backend::Cpu);
        let v = serde_json::to_value(e.predict(&[0.0], Algorithm::Qaoa)).unwrap();
        assert_eq!(v["prediction"], "optimal_value: 0.0000");
        assert_eq!(v["algorithm"], "qaoa");
    }

    #[test]
    fn test_statistics_reflect_counters() {
        let e = engine(Backend::Cloud);
        let mut stats = EngineStats::default();
        e.generate_random(&mut stats, 100);
        e.generate_random(&mut stats, 28);
        let s = e.statistics(&stats);
        assert_eq!(s.circuits_executed, 2);
        assert_eq!(s.total_random_bits, 128);
        assert!(!s.cuda_available);
        assert_eq!(s.num_qubits_available, 16);
    }

    #[test]
    fn test_benchmark_counts_runs() {
        let e = engine(Backend::Cpu);
        let mut stats = EngineStats::default();
        let b = e.benchmark(&mut stats).unwrap();
        assert_eq!(stats.circuits_executed, 15);
        assert_eq!(stats.total_random_bits, 2560);
        assert_eq!(b.gpu_speedup, "N/A");
        assert!(b.ml_predictions_10x >= 0.0);
    }

    #[test]
    fn test_banner_mentions_config() {
        let banner = engine(Backend::NvidiaGpu).banner();
        assert!(banner.contains("nvidia-gpu"));
        assert!(banner.contains("Enabled"));
        assert!(banner.contains("Active"));
    }

    #[test]
    fn test_reports_serialize() {
        let e = engine(Backend::Cpu);
        let r = e.generate_random(&mut EngineStats::default(), 8);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["backend"], "cpu");
        assert_eq!(v["random_bits"], 8);
    }
}
