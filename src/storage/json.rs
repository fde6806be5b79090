//! File-backed structured store holding its fields as a JSON object.

use crate::error::Result;
use crate::storage::{StoreValue, StructuredStore};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    fields: BTreeMap<String, StoreValue>,
}

impl JsonFileStore {
    /// Open the store at `path`, reading its fields if the file exists
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let fields = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let fields: BTreeMap<String, StoreValue> = serde_json::from_reader(reader)?;
            info!("Loaded {} fields from {}", fields.len(), path.display());
            fields
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, fields })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StructuredStore for JsonFileStore {
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

    fn flush(&mut self) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.fields)?;
        writer.flush()?;
        debug!("Wrote {} fields to {}", self.fields.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flush_and_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("params.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_string("type", "Canberra").unwrap();
        store.set_u64("refinement_rounds", 4).unwrap();
        store.set_f64_array("weights", &[0.25, 0.75]).unwrap();
        store.flush().unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_string("type").unwrap().as_deref(), Some("Canberra"));
        assert_eq!(reopened.get_u64("refinement_rounds").unwrap(), Some(4));
        assert_eq!(reopened.get_f64_array("weights").unwrap(), Some(vec![0.25, 0.75]));
    }

    #[test]
    fn test_unparseable_file_is_store_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(err.is_store_failure());
    }

    #[test]
    fn test_unwritable_path_is_store_failure() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::open(dir.path().join("missing").join("params.json")).unwrap();
        store.set_string("type", "Canberra").unwrap();
        assert!(store.flush().unwrap_err().is_store_failure());
    }
}
