//! Scoring functions behind the individual similarity types.
//!
//! All functions expect jets (and frequency slices) of equal length; the
//! dispatching `SimilarityFunction` checks this before calling in here.

use crate::error::{JetSimilarityError, Result};
use crate::jet::{FrequencyVector, Jet};
use crate::similarity::disparity::{residual_phase, Disparity};

/// Normalised inner product of the absolute values
pub fn scalar_product(jet_a: &Jet, jet_b: &Jet) -> Result<f64> {
    let norm_a = jet_a.abs().iter().map(|a| a * a).sum::<f64>().sqrt();
    let norm_b = jet_b.abs().iter().map(|b| b * b).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(JetSimilarityError::DegenerateInput(
            "scalar product similarity is undefined for a jet with zero norm".to_string(),
        ));
    }

    let dot: f64 = jet_a
        .abs()
        .iter()
        .zip(jet_b.abs().iter())
        .map(|(a, b)| a * b)
        .sum();

    Ok(dot / (norm_a * norm_b))
}

/// One minus the mean Canberra distance of the absolute values.
///
/// Elements where both magnitudes vanish count as identical.
pub fn canberra(jet_a: &Jet, jet_b: &Jet) -> f64 {
    let distance: f64 = jet_a
        .abs()
        .iter()
        .zip(jet_b.abs().iter())
        .map(|(a, b)| {
            let sum = a + b;
            if sum > 0.0 {
                (a - b).abs() / sum
            } else {
                0.0
            }
        })
        .sum();

    1.0 - distance / jet_a.len() as f64
}

/// Magnitude-weighted mean cosine of the disparity-corrected phase residuals.
///
/// Returns 0 when the magnitude products sum to zero.
pub fn weighted_phase_agreement(
    frequencies: &[FrequencyVector],
    jet_a: &Jet,
    jet_b: &Jet,
    disparity: Disparity,
) -> f64 {
    let (mut score, mut total_weight) = (0.0, 0.0);
    for (i, f) in frequencies.iter().enumerate() {
        let weight = jet_a.abs()[i] * jet_b.abs()[i];
        if weight == 0.0 {
            continue;
        }
        score += weight * residual_phase(f, jet_a.phase()[i], jet_b.phase()[i], disparity).cos();
        total_weight += weight;
    }

    if total_weight > 0.0 {
        score / total_weight
    } else {
        0.0
    }
}

/// Unweighted mean cosine of the disparity-corrected phase residuals,
/// clamped into [0, 1].
pub fn phase_agreement(
    frequencies: &[FrequencyVector],
    jet_a: &Jet,
    jet_b: &Jet,
    disparity: Disparity,
) -> f64 {
    let sum: f64 = frequencies
        .iter()
        .enumerate()
        .map(|(i, f)| residual_phase(f, jet_a.phase()[i], jet_b.phase()[i], disparity).cos())
        .sum();

    (sum / frequencies.len() as f64).clamp(0.0, 1.0)
}
