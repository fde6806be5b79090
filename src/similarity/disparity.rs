//! Phase-based disparity estimation between two Gabor jets.
//!
//! The phase difference of element `i` approximates `2π · (frequency_i · d)`
//! for a small displacement `d`. The estimator repeatedly wraps the residual
//! phase differences relative to the current estimate and solves the weighted
//! least-squares normal equations for a correction, so components that wrap
//! in early rounds become unambiguous once the estimate has moved closer.

use crate::jet::{FrequencyVector, Jet};
use log::{debug, warn};
use std::f64::consts::PI;

/// Number of refinement rounds used unless configured otherwise
pub const DEFAULT_REFINEMENT_ROUNDS: usize = 10;

/// Estimated 2D displacement (in pixels) between the locations of two jets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Disparity {
    pub x: f64,
    pub y: f64,
}

impl Disparity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl From<Disparity> for (f64, f64) {
    fn from(d: Disparity) -> Self {
        (d.x, d.y)
    }
}

/// Wrap an angle into (-π, π]
pub fn adjust_phase(phase: f64) -> f64 {
    let wrapped = (phase + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Phase difference of element `i` that remains after compensating the
/// displacement `d`, wrapped into (-π, π].
pub fn residual_phase(frequency: &FrequencyVector, phase_a: f64, phase_b: f64, d: Disparity) -> f64 {
    adjust_phase(phase_a - phase_b - frequency.phase_shift(d.x, d.y))
}

/// Fixed-round iterative disparity estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisparityEstimator {
    rounds: usize,
}

impl Default for DisparityEstimator {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_REFINEMENT_ROUNDS,
        }
    }
}

impl DisparityEstimator {
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Estimate the displacement that maps `jet_a` onto `jet_b`.
    ///
    /// Callers guarantee that both jets and `frequencies` have the same length.
    /// Returns (0, 0) when the weighted normal equations are singular, i.e. when
    /// the jets carry no usable phase information.
    pub fn estimate(&self, frequencies: &[FrequencyVector], jet_a: &Jet, jet_b: &Jet) -> Disparity {
        let weights: Vec<f64> = jet_a
            .abs()
            .iter()
            .zip(jet_b.abs().iter())
            .map(|(a, b)| a * b)
            .collect();

        // The normal matrix only depends on weights and frequencies
        let (mut gamma_xx, mut gamma_xy, mut gamma_yy) = (0.0, 0.0, 0.0);
        for (f, &w) in frequencies.iter().zip(weights.iter()) {
            let kx = 2.0 * PI * f.x;
            let ky = 2.0 * PI * f.y;
            gamma_xx += w * kx * kx;
            gamma_xy += w * kx * ky;
            gamma_yy += w * ky * ky;
        }

        let det = gamma_xx * gamma_yy - gamma_xy * gamma_xy;
        if det.abs() <= f64::EPSILON * (gamma_xx * gamma_yy).abs() || !det.is_finite() {
            warn!("Singular disparity system (det = {:e}), reporting zero disparity", det);
            return Disparity::zero();
        }

        let mut estimate = Disparity::zero();
        for _ in 0..self.rounds {
            let (mut phi_x, mut phi_y) = (0.0, 0.0);
            for (((f, &w), &pa), &pb) in frequencies
                .iter()
                .zip(weights.iter())
                .zip(jet_a.phase().iter())
                .zip(jet_b.phase().iter())
            {
                if w == 0.0 {
                    continue;
                }
                let diff = residual_phase(f, pa, pb, estimate);
                phi_x += w * diff * 2.0 * PI * f.x;
                phi_y += w * diff * 2.0 * PI * f.y;
            }

            estimate.x += (gamma_yy * phi_x - gamma_xy * phi_y) / det;
            estimate.y += (gamma_xx * phi_y - gamma_xy * phi_x) / det;
        }

        debug!(
            "Disparity after {} rounds: ({:.6}, {:.6})",
            self.rounds, estimate.x, estimate.y
        );
        estimate
    }
}
