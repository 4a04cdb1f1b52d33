//! File-per-record JSON storage.
//!
//! Layout: `{base}/{collection}/{id}.json`. Plain files keep the data
//! directory friendly to `git diff` and merges.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Serialize, de::DeserializeOwned};

use super::traits::{HasId, Storage};
use crate::error::{KarteiError, Result};

const EXTENSION: &str = "json";

/// JSON document storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    /// Create a new JsonFileStorage at the given path.
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the directory for a collection.
    fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_path.join(collection)
    }

    /// Get the file path for a record, rejecting ids that would escape the collection.
    fn record_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(KarteiError::Storage(format!("Invalid record id: {:?}", id)));
        }
        Ok(self.collection_path(collection).join(format!("{}.{}", id, EXTENSION)))
    }

    /// Write via a temporary file so a crash never leaves a half-written record.
    fn write_record<T: Serialize>(&self, path: &Path, record: &T) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(record)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn create<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        let path = self.record_path(collection, record.id())?;
        if path.exists() {
            return Err(KarteiError::Storage(format!(
                "Record already exists: {}/{}",
                collection,
                record.id()
            )));
        }
        self.write_record(&path, record)
    }

    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        let path = self.record_path(collection, id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn update<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()> {
        let path = self.record_path(collection, record.id())?;
        if !path.exists() {
            return Err(KarteiError::Storage(format!(
                "Record not found: {}/{}",
                collection,
                record.id()
            )));
        }
        self.write_record(&path, record)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let path = self.record_path(collection, id)?;
        if !path.exists() {
            return Err(KarteiError::Storage(format!("Record not found: {}/{}", collection, id)));
        }
        fs::remove_file(&path)?;
        Ok(())
    }

    fn exists(&self, collection: &str, id: &str) -> bool {
        self.record_path(collection, id).map(|p| p.exists()).unwrap_or(false)
    }

    fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let dir = self.collection_path(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == EXTENSION))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            // A single corrupt file should not hide the rest of the collection
            let parsed: Result<T> = fs::read_to_string(&path)
                .map_err(KarteiError::from)
                .and_then(|content| serde_json::from_str(&content).map_err(KarteiError::from));
            match parsed {
                Ok(record) => records.push(record),
                Err(e) => warn!("Unable to read {}: {}", path.display(), e),
            }
        }
        Ok(records)
    }
}
