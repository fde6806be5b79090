pub mod disparity;
pub mod measures;

use crate::error::{JetSimilarityError, Result};
use crate::jet::{FrequencySource, FrequencyTable, Jet};
use crate::storage::{codec, StructuredStore};
use disparity::{Disparity, DisparityEstimator, DEFAULT_REFINEMENT_ROUNDS};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// The kinds of Gabor jet similarity functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityType {
    /// Normalised scalar product of the absolute values
    ScalarProduct,
    /// Canberra similarity of the absolute values
    Canberra,
    /// Magnitude-weighted, disparity-corrected phase similarity
    Disparity,
    /// Unweighted, disparity-corrected phase similarity
    PhaseDiff,
    /// Average of `Canberra` and `PhaseDiff`
    PhaseDiffPlusCanberra,
}

impl SimilarityType {
    pub const ALL: [SimilarityType; 5] = [
        SimilarityType::ScalarProduct,
        SimilarityType::Canberra,
        SimilarityType::Disparity,
        SimilarityType::PhaseDiff,
        SimilarityType::PhaseDiffPlusCanberra,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityType::ScalarProduct => "ScalarProduct",
            SimilarityType::Canberra => "Canberra",
            SimilarityType::Disparity => "Disparity",
            SimilarityType::PhaseDiff => "PhaseDiff",
            SimilarityType::PhaseDiffPlusCanberra => "PhaseDiffPlusCanberra",
        }
    }

    /// Whether this type estimates a disparity and thus needs wavelet frequencies
    pub fn needs_disparity(&self) -> bool {
        matches!(
            self,
            SimilarityType::Disparity | SimilarityType::PhaseDiff | SimilarityType::PhaseDiffPlusCanberra
        )
    }
}

impl fmt::Display for SimilarityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityType {
    type Err = JetSimilarityError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| {
                JetSimilarityError::InvalidArgument(format!(
                    "unknown similarity type '{}'; expected one of ScalarProduct, Canberra, Disparity, PhaseDiff, PhaseDiffPlusCanberra",
                    name
                ))
            })
    }
}

/// Tunable parameters of a similarity function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityConfig {
    /// Number of refinement rounds of the disparity estimator
    pub refinement_rounds: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            refinement_rounds: DEFAULT_REFINEMENT_ROUNDS,
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.refinement_rounds == 0 {
            return Err(JetSimilarityError::InvalidArgument(
                "refinement_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Frequency geometry and estimator carried by the disparity-aware types
#[derive(Debug, Clone)]
struct DisparityModel {
    frequencies: FrequencyTable,
    estimator: DisparityEstimator,
}

#[derive(Debug, Clone)]
enum Variant {
    ScalarProduct,
    Canberra,
    Disparity(DisparityModel),
    PhaseDiff(DisparityModel),
    PhaseDiffPlusCanberra(DisparityModel),
}

/// A Gabor jet similarity function of one fixed type.
///
/// Disparity-aware types remember the disparity of the most recent call in
/// [`last_disparity`](Self::last_disparity). Comparing therefore takes
/// `&mut self`; share an instance between threads only behind a lock.
#[derive(Debug, Clone)]
pub struct SimilarityFunction {
    variant: Variant,
    config: SimilarityConfig,
    last_disparity: Disparity,
}

impl SimilarityFunction {
    /// Create a similarity function with the default configuration.
    ///
    /// `source` supplies the wavelet frequencies and is required for
    /// `Disparity`, `PhaseDiff` and `PhaseDiffPlusCanberra`; other types ignore it.
    pub fn new(similarity_type: SimilarityType, source: Option<&dyn FrequencySource>) -> Result<Self> {
        Self::with_config(similarity_type, source, SimilarityConfig::default())
    }

    /// Create a similarity function from its type name, e.g. `"PhaseDiff"`
    pub fn from_name(name: &str, source: Option<&dyn FrequencySource>) -> Result<Self> {
        Self::new(name.parse()?, source)
    }

    pub fn with_config(
        similarity_type: SimilarityType,
        source: Option<&dyn FrequencySource>,
        config: SimilarityConfig,
    ) -> Result<Self> {
        config.validate()?;

        let variant = if similarity_type.needs_disparity() {
            let source = source.ok_or_else(|| {
                JetSimilarityError::MissingDependency(format!(
                    "similarity type '{}' requires the wavelet frequencies of the transform",
                    similarity_type
                ))
            })?;
            let model = DisparityModel {
                frequencies: source.frequency_table()?,
                estimator: DisparityEstimator::new(config.refinement_rounds),
            };
            match similarity_type {
                SimilarityType::Disparity => Variant::Disparity(model),
                SimilarityType::PhaseDiff => Variant::PhaseDiff(model),
                _ => Variant::PhaseDiffPlusCanberra(model),
            }
        } else if similarity_type == SimilarityType::ScalarProduct {
            Variant::ScalarProduct
        } else {
            Variant::Canberra
        };

        debug!(
            "Created {} similarity function ({} refinement rounds)",
            similarity_type, config.refinement_rounds
        );

        Ok(Self {
            variant,
            config,
            last_disparity: Disparity::zero(),
        })
    }

    /// Restore a similarity function from a structured store.
    ///
    /// The store only holds the parametrisation; disparity-aware types need
    /// the frequencies to be supplied again through `source`.
    pub fn load(store: &dyn StructuredStore, source: Option<&dyn FrequencySource>) -> Result<Self> {
        let (similarity_type, config) = codec::load_configuration(store)?;
        Self::with_config(similarity_type, source, config)
    }

    /// Re-parametrise this instance from a structured store, keeping its own
    /// frequency table if the loaded type needs one.
    pub fn reload(&mut self, store: &dyn StructuredStore) -> Result<()> {
        let (similarity_type, config) = codec::load_configuration(store)?;
        let frequencies = self.frequency_table().cloned();
        let source = frequencies.as_ref().map(|f| f as &dyn FrequencySource);
        *self = Self::with_config(similarity_type, source, config)?;
        Ok(())
    }

    pub fn save(&self, store: &mut dyn StructuredStore) -> Result<()> {
        codec::save_configuration(self, store)
    }

    pub fn similarity_type(&self) -> SimilarityType {
        match self.variant {
            Variant::ScalarProduct => SimilarityType::ScalarProduct,
            Variant::Canberra => SimilarityType::Canberra,
            Variant::Disparity(_) => SimilarityType::Disparity,
            Variant::PhaseDiff(_) => SimilarityType::PhaseDiff,
            Variant::PhaseDiffPlusCanberra(_) => SimilarityType::PhaseDiffPlusCanberra,
        }
    }

    /// Exact name of the similarity type
    pub fn type_name(&self) -> &'static str {
        self.similarity_type().name()
    }

    pub fn config(&self) -> SimilarityConfig {
        self.config
    }

    pub fn frequency_table(&self) -> Option<&FrequencyTable> {
        self.model().map(|m| &m.frequencies)
    }

    /// Disparity computed by the most recent `similarity` or `disparity` call;
    /// (0, 0) before the first one.
    pub fn last_disparity(&self) -> Disparity {
        self.last_disparity
    }

    /// Similarity between two jets; higher values mean more similar jets
    pub fn similarity(&mut self, jet_a: &Jet, jet_b: &Jet) -> Result<f64> {
        self.similarity_with_disparity(jet_a, jet_b).map(|(sim, _)| sim)
    }

    /// Similarity together with the disparity it was corrected for, if any
    pub fn similarity_with_disparity(&mut self, jet_a: &Jet, jet_b: &Jet) -> Result<(f64, Option<Disparity>)> {
        self.check_jets(jet_a, jet_b)?;

        let (sim, disparity) = match &self.variant {
            Variant::ScalarProduct => (measures::scalar_product(jet_a, jet_b)?, None),
            Variant::Canberra => (measures::canberra(jet_a, jet_b), None),
            Variant::Disparity(model) => {
                let d = model.estimator.estimate(model.frequencies.frequencies(), jet_a, jet_b);
                let sim = measures::weighted_phase_agreement(model.frequencies.frequencies(), jet_a, jet_b, d);
                (sim, Some(d))
            }
            Variant::PhaseDiff(model) => {
                let d = model.estimator.estimate(model.frequencies.frequencies(), jet_a, jet_b);
                let sim = measures::phase_agreement(model.frequencies.frequencies(), jet_a, jet_b, d);
                (sim, Some(d))
            }
            Variant::PhaseDiffPlusCanberra(model) => {
                let d = model.estimator.estimate(model.frequencies.frequencies(), jet_a, jet_b);
                let phase = measures::phase_agreement(model.frequencies.frequencies(), jet_a, jet_b, d);
                (0.5 * (phase + measures::canberra(jet_a, jet_b)), Some(d))
            }
        };

        if let Some(d) = disparity {
            self.last_disparity = d;
        }
        Ok((sim, disparity))
    }

    /// Estimate the displacement between the image locations of two jets.
    ///
    /// Only available for disparity-aware types.
    pub fn disparity(&mut self, jet_a: &Jet, jet_b: &Jet) -> Result<Disparity> {
        let similarity_type = self.similarity_type();
        let model = self.model().ok_or(JetSimilarityError::UnsupportedOperation {
            operation: "disparity",
            similarity_type,
        })?;
        self.check_jets(jet_a, jet_b)?;

        let d = model.estimator.estimate(model.frequencies.frequencies(), jet_a, jet_b);
        self.last_disparity = d;
        Ok(d)
    }

    fn model(&self) -> Option<&DisparityModel> {
        match &self.variant {
            Variant::ScalarProduct | Variant::Canberra => None,
            Variant::Disparity(model) | Variant::PhaseDiff(model) | Variant::PhaseDiffPlusCanberra(model) => {
                Some(model)
            }
        }
    }

    fn check_jets(&self, jet_a: &Jet, jet_b: &Jet) -> Result<()> {
        if jet_a.len() != jet_b.len() {
            return Err(JetSimilarityError::InvalidArgument(format!(
                "jets have different lengths: {} and {}",
                jet_a.len(),
                jet_b.len()
            )));
        }
        if jet_a.is_empty() {
            return Err(JetSimilarityError::InvalidArgument(
                "jets must contain at least one element".to_string(),
            ));
        }
        if let Some(model) = self.model() {
            if jet_a.len() != model.frequencies.len() {
                return Err(JetSimilarityError::InvalidArgument(format!(
                    "jets have {} elements but the transform has {} wavelets",
                    jet_a.len(),
                    model.frequencies.len()
                )));
            }
        }
        Ok(())
    }
}
