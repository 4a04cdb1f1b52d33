//! Storage trait definitions.

use crate::error::Result;
use serde::{Serialize, de::DeserializeOwned};

/// Trait for records that have an ID field.
pub trait HasId {
    /// Get the record's unique identifier.
    fn id(&self) -> &str;
}

/// Storage trait for CRUD operations on records grouped in collections.
pub trait Storage: Send + Sync {
    /// Create a new record. Fails if a record with the same id exists.
    fn create<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()>;

    /// Get a record by ID.
    fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>>;

    /// Overwrite an existing record. Fails if it does not exist.
    fn update<T: Serialize + HasId>(&self, collection: &str, record: &T) -> Result<()>;

    /// Delete a record by ID. Fails if it does not exist.
    fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Check whether a record exists.
    fn exists(&self, collection: &str, id: &str) -> bool;

    /// List all readable records in a collection.
    fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>>;
}
