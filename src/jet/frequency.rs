//! Wavelet centre frequencies associated with the elements of a jet.
//!
//! The frequencies are expressed in cycles per pixel, so that a displacement
//! `d` shifts the phase of element `i` by `2π · (frequency_i · d)`.

use crate::error::{JetSimilarityError, Result};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, PI};

/// Default number of scales of the Gabor wavelet family
pub const DEFAULT_SCALES: usize = 5;
/// Default number of orientations per scale
pub const DEFAULT_DIRECTIONS: usize = 8;
/// Angular frequency of the finest wavelet, in radians per pixel
pub const DEFAULT_K_MAX: f64 = FRAC_PI_2;
/// Ratio between the angular frequencies of two neighbouring scales
pub const DEFAULT_K_FAC: f64 = FRAC_1_SQRT_2;

/// 2D spatial frequency of one wavelet (horizontal, vertical)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyVector {
    pub x: f64,
    pub y: f64,
}

impl FrequencyVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Phase shift in radians produced by moving `dx`, `dy` pixels
    pub fn phase_shift(&self, dx: f64, dy: f64) -> f64 {
        2.0 * PI * (self.x * dx + self.y * dy)
    }
}

/// Fixed set of wavelet frequencies, one per jet element
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyTable {
    frequencies: Vec<FrequencyVector>,
}

impl FrequencyTable {
    pub fn new(frequencies: Vec<FrequencyVector>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(JetSimilarityError::InvalidArgument(
                "frequency table must contain at least one frequency".to_string(),
            ));
        }
        if let Some(i) = frequencies
            .iter()
            .position(|f| !f.x.is_finite() || !f.y.is_finite())
        {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "frequency at index {} is not finite",
                i
            )));
        }

        Ok(Self { frequencies })
    }

    pub fn frequencies(&self) -> &[FrequencyVector] {
        &self.frequencies
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

/// Anything able to supply the frequency geometry of a wavelet transform
pub trait FrequencySource {
    fn frequency_table(&self) -> Result<FrequencyTable>;
}

impl FrequencySource for FrequencyTable {
    fn frequency_table(&self) -> Result<FrequencyTable> {
        Ok(self.clone())
    }
}

/// Geometry of the standard Gabor wavelet family.
///
/// Element `s * directions + d` has angular frequency
/// `k_max * k_fac^s * (cos(π d / D), sin(π d / D))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaborBank {
    pub scales: usize,
    pub directions: usize,
    pub k_max: f64,
    pub k_fac: f64,
}

impl Default for GaborBank {
    fn default() -> Self {
        Self {
            scales: DEFAULT_SCALES,
            directions: DEFAULT_DIRECTIONS,
            k_max: DEFAULT_K_MAX,
            k_fac: DEFAULT_K_FAC,
        }
    }
}

impl GaborBank {
    pub fn number_of_wavelets(&self) -> usize {
        self.scales * self.directions
    }
}

impl FrequencySource for GaborBank {
    fn frequency_table(&self) -> Result<FrequencyTable> {
        if self.scales == 0 || self.directions == 0 {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "Gabor bank needs at least one scale and direction, got {}x{}",
                self.scales, self.directions
            )));
        }

        let frequencies = (0..self.scales)
            .flat_map(|s| (0..self.directions).map(move |d| (s, d)))
            .map(|(s, d)| {
                let k = self.k_max * self.k_fac.powi(s as i32);
                let angle = PI * d as f64 / self.directions as f64;
                // angular frequency to cycles per pixel
                FrequencyVector::new(k * angle.cos() / (2.0 * PI), k * angle.sin() / (2.0 * PI))
            })
            .collect();

        FrequencyTable::new(frequencies)
    }
}
