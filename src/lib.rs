//! Gabor Jet Similarity Library
//!
//! Compares Gabor jets, the vectors of complex Gabor wavelet responses sampled
//! at one image location over several scales and orientations, as used for
//! facial landmark correspondence and biometric matching.
//!
//! ## Similarity Functions
//!
//! A [`SimilarityFunction`] has one of five fixed types:
//!
//! - **ScalarProduct**: normalised inner product of the absolute values
//! - **Canberra**: one minus the mean Canberra distance of the absolute values
//! - **Disparity**: magnitude-weighted cosine of the phase differences that
//!   remain after compensating the estimated disparity
//! - **PhaseDiff**: unweighted mean cosine of the compensated phase differences
//! - **PhaseDiffPlusCanberra**: average of the Canberra and PhaseDiff scores
//!
//! The last three estimate the displacement between the two jets from their
//! phase differences and the wavelet frequencies ([`FrequencyTable`]) and keep
//! it available as [`SimilarityFunction::last_disparity`].
//!
//! ## Disparity Estimation
//!
//! `similarity::disparity::DisparityEstimator` runs a fixed number of rounds.
//! Each round wraps the residual phase differences into (-π, π] relative to the
//! current estimate and solves the magnitude-weighted 2×2 least-squares system
//! for a correction, resolving wrap ambiguities of the high frequencies once the
//! low frequencies have moved the estimate close enough.
//!
//! ## Persistence
//!
//! [`SimilarityFunction::save`] and [`SimilarityFunction::load`] write and read
//! the parametrisation through any [`StructuredStore`], such as the in-memory
//! [`MemoryStore`] or the file-backed [`JsonFileStore`]. The wavelet
//! frequencies are not stored and have to be supplied again on load.

pub mod error;
pub mod jet;
pub mod similarity;
pub mod storage;

pub use error::{JetSimilarityError, Result};
pub use jet::{FrequencySource, FrequencyTable, FrequencyVector, GaborBank, Jet};
pub use similarity::{
    disparity::{Disparity, DisparityEstimator, DEFAULT_REFINEMENT_ROUNDS},
    SimilarityConfig, SimilarityFunction, SimilarityType,
};
pub use storage::{JsonFileStore, MemoryStore, StoreValue, StructuredStore};
