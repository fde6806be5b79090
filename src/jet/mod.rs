pub mod frequency;

use crate::error::{JetSimilarityError, Result};
use rustfft::num_complex::Complex;

pub use frequency::{FrequencySource, FrequencyTable, FrequencyVector, GaborBank};

/// Gabor jet: the complex wavelet responses sampled at one image location,
/// stored as parallel absolute-value and phase sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct Jet {
    abs: Vec<f64>,
    phase: Vec<f64>,
}

impl Jet {
    /// Create a jet from magnitudes and phases of equal length
    pub fn new(abs: Vec<f64>, phase: Vec<f64>) -> Result<Self> {
        if abs.len() != phase.len() {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "jet has {} absolute values but {} phases",
                abs.len(),
                phase.len()
            )));
        }
        if let Some(i) = abs.iter().position(|a| !a.is_finite() || *a < 0.0) {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "jet absolute value {} at index {} must be finite and non-negative",
                abs[i], i
            )));
        }
        if let Some(i) = phase.iter().position(|p| !p.is_finite()) {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "jet phase at index {} is not finite",
                i
            )));
        }

        Ok(Self { abs, phase })
    }

    /// Split complex wavelet responses into magnitude and phase
    pub fn from_complex(responses: &[Complex<f64>]) -> Result<Self> {
        let abs = responses.iter().map(|c| c.norm()).collect();
        let phase = responses.iter().map(|c| c.arg()).collect();
        Self::new(abs, phase)
    }

    pub fn to_complex(&self) -> Vec<Complex<f64>> {
        self.abs
            .iter()
            .zip(self.phase.iter())
            .map(|(&a, &p)| Complex::from_polar(a, p))
            .collect()
    }

    /// Copy of this jet whose magnitudes have unit Euclidean norm
    pub fn normalized(&self) -> Result<Self> {
        let norm = self.abs.iter().map(|a| a * a).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(JetSimilarityError::DegenerateInput(
                "cannot normalise a jet with zero magnitude".to_string(),
            ));
        }

        Ok(Self {
            abs: self.abs.iter().map(|a| a / norm).collect(),
            phase: self.phase.clone(),
        })
    }

    pub fn abs(&self) -> &[f64] {
        &self.abs
    }

    pub fn phase(&self) -> &[f64] {
        &self.phase
    }

    pub fn len(&self) -> usize {
        self.abs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abs.is_empty()
    }
}
