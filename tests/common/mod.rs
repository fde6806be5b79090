// Shared helpers for the integration tests

#![allow(dead_code)]

use gabor_jet_similarity::similarity::disparity::adjust_phase;
use gabor_jet_similarity::{Disparity, FrequencyTable, Jet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Absolute tolerance for comparisons of similarity values
pub const EPS: f64 = 1e-9;

pub const SEED: u64 = 0x6a65_7473;

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(SEED)
}

/// Jet with magnitudes in [0.1, 1) and phases in [-π, π)
pub fn random_jet(rng: &mut StdRng, len: usize) -> Jet {
    let abs = (0..len).map(|_| rng.gen_range(0.1..1.0)).collect();
    let phase = (0..len).map(|_| rng.gen_range(-PI..PI)).collect();
    Jet::new(abs, phase).expect("random jet is valid")
}

/// Copy of `jet` whose phases are moved by the displacement `d`
pub fn shifted_jet(jet: &Jet, table: &FrequencyTable, d: Disparity) -> Jet {
    let phase = jet
        .phase()
        .iter()
        .zip(table.frequencies().iter())
        .map(|(&p, f)| adjust_phase(p - f.phase_shift(d.x, d.y)))
        .collect();
    Jet::new(jet.abs().to_vec(), phase).expect("shifted jet is valid")
}
