pub mod codec;
pub mod json;

use crate::error::{JetSimilarityError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use codec::{load_configuration, save_configuration, REFINEMENT_ROUNDS_KEY, TYPE_KEY};
pub use json::JsonFileStore;

/// A single field of a structured store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreValue {
    String(String),
    Float(f64),
    Integer(u64),
    FloatArray(Vec<f64>),
}

impl StoreValue {
    fn kind(&self) -> &'static str {
        match self {
            StoreValue::String(_) => "string",
            StoreValue::Float(_) => "float",
            StoreValue::Integer(_) => "integer",
            StoreValue::FloatArray(_) => "float array",
        }
    }
}

fn mismatch(key: &str, expected: &str, found: &StoreValue) -> JetSimilarityError {
    JetSimilarityError::CorruptData(format!(
        "field '{}' holds a {} where a {} was expected",
        key,
        found.kind(),
        expected
    ))
}

/// Key-value store with scalar and array fields, e.g. a parameter file.
///
/// Typed getters return `Ok(None)` for a missing key and `CorruptData` when
/// the field holds a value of another kind. Implementations backed by their
/// own I/O layer report its failures as `JetSimilarityError::StoreIo`.
pub trait StructuredStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>>;

    fn set(&mut self, key: &str, value: StoreValue) -> Result<()>;

    /// Delete a field; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Persist pending writes
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        self.set(key, StoreValue::String(value.to_string()))
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoreValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(mismatch(key, "string", &other)),
        }
    }

    fn set_f64(&mut self, key: &str, value: f64) -> Result<()> {
        self.set(key, StoreValue::Float(value))
    }

    fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoreValue::Float(v)) => Ok(Some(v)),
            Some(StoreValue::Integer(v)) => Ok(Some(v as f64)),
            Some(other) => Err(mismatch(key, "float", &other)),
        }
    }

    fn set_u64(&mut self, key: &str, value: u64) -> Result<()> {
        self.set(key, StoreValue::Integer(value))
    }

    fn get_u64(&self, key: &str) -> Result<Option<u64>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoreValue::Integer(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, "integer", &other)),
        }
    }

    fn set_f64_array(&mut self, key: &str, values: &[f64]) -> Result<()> {
        self.set(key, StoreValue::FloatArray(values.to_vec()))
    }

    fn get_f64_array(&self, key: &str) -> Result<Option<Vec<f64>>> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoreValue::FloatArray(v)) => Ok(Some(v)),
            Some(other) => Err(mismatch(key, "float array", &other)),
        }
    }
}

/// In-memory structured store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    fields: BTreeMap<String, StoreValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl StructuredStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.fields.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: StoreValue) -> Result<()> {
        self.fields.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.fields.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_round_trip() {
        let mut store = MemoryStore::new();
        store.set_string("name", "PhaseDiff").unwrap();
        store.set_f64("scale", 0.5).unwrap();
        store.set_u64("rounds", 7).unwrap();
        store.set_f64_array("values", &[1.0, 2.5]).unwrap();

        assert_eq!(store.get_string("name").unwrap().as_deref(), Some("PhaseDiff"));
        assert_eq!(store.get_f64("scale").unwrap(), Some(0.5));
        assert_eq!(store.get_u64("rounds").unwrap(), Some(7));
        assert_eq!(store.get_f64("rounds").unwrap(), Some(7.0));
        assert_eq!(store.get_f64_array("values").unwrap(), Some(vec![1.0, 2.5]));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_missing_and_mismatched_fields() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_string("absent").unwrap(), None);
        assert!(!store.contains("absent").unwrap());

        store.set_f64("scale", 0.5).unwrap();
        assert!(matches!(store.get_string("scale"), Err(JetSimilarityError::CorruptData(_))));
        assert!(matches!(store.get_u64("scale"), Err(JetSimilarityError::CorruptData(_))));
    }

    #[test]
    fn test_remove_field() {
        let mut store = MemoryStore::new();
        store.set_u64("rounds", 3).unwrap();
        store.remove("rounds").unwrap();
        store.remove("rounds").unwrap();
        assert!(!store.contains("rounds").unwrap());
        assert!(store.is_empty());
    }
}
