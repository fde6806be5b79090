//! Persistence of a similarity function's parametrisation.
//!
//! Only the type tag is written, plus the refinement round count when it
//! differs from the default; saving a default count drops any count left in
//! the store by an earlier save. Wavelet frequencies belong to the transform and
//! are supplied again when loading.

use crate::error::{JetSimilarityError, Result};
use crate::similarity::disparity::DEFAULT_REFINEMENT_ROUNDS;
use crate::similarity::{SimilarityConfig, SimilarityFunction, SimilarityType};
use crate::storage::StructuredStore;
use log::debug;

/// Field holding the similarity type name
pub const TYPE_KEY: &str = "type";
/// Field holding a non-default refinement round count
pub const REFINEMENT_ROUNDS_KEY: &str = "refinement_rounds";

pub fn save_configuration(function: &SimilarityFunction, store: &mut dyn StructuredStore) -> Result<()> {
    store.set_string(TYPE_KEY, function.type_name())?;

    let rounds = function.config().refinement_rounds;
    if rounds != DEFAULT_REFINEMENT_ROUNDS {
        store.set_u64(REFINEMENT_ROUNDS_KEY, rounds as u64)?;
    } else {
        // a previous save into the same store may have left a count behind
        store.remove(REFINEMENT_ROUNDS_KEY)?;
    }
    store.flush()?;

    debug!("Saved {} similarity configuration", function.type_name());
    Ok(())
}

pub fn load_configuration(store: &dyn StructuredStore) -> Result<(SimilarityType, SimilarityConfig)> {
    let name = store
        .get_string(TYPE_KEY)?
        .ok_or_else(|| JetSimilarityError::CorruptData(format!("missing field '{}'", TYPE_KEY)))?;
    let similarity_type: SimilarityType = name.parse().map_err(|_| {
        JetSimilarityError::CorruptData(format!("unknown similarity type '{}' in field '{}'", name, TYPE_KEY))
    })?;

    let refinement_rounds = match store.get_u64(REFINEMENT_ROUNDS_KEY)? {
        None => DEFAULT_REFINEMENT_ROUNDS,
        Some(0) => {
            return Err(JetSimilarityError::CorruptData(format!(
                "field '{}' must be at least 1",
                REFINEMENT_ROUNDS_KEY
            )))
        }
        Some(rounds) => usize::try_from(rounds).map_err(|_| {
            JetSimilarityError::CorruptData(format!("field '{}' is out of range: {}", REFINEMENT_ROUNDS_KEY, rounds))
        })?,
    };

    debug!("Loaded {} similarity configuration", similarity_type);
    Ok((similarity_type, SimilarityConfig { refinement_rounds }))
}
