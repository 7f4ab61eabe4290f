use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::database::{CollectionSchema, Database};
use super::write_atomic;
use crate::error::{ConverterError, Result};

/// Access mode of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionMode {
    ReadOnly,
    ReadWrite,
}

/// On-disk contents of one collection
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct CollectionData {
    /// Next key handed out by auto-increment collections
    #[serde(default = "first_id")]
    next_id: u64,
    /// Records indexed by their JSON-encoded primary key
    #[serde(default)]
    records: BTreeMap<String, Value>,
}

fn first_id() -> u64 {
    1
}

impl Default for CollectionData {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            records: BTreeMap::new(),
        }
    }
}

impl CollectionData {
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }
}

/// A put waiting for commit
#[derive(Debug)]
struct StagedPut {
    key: Value,
    record: Value,
    /// Key was handed out by auto-increment rather than supplied
    assigned: bool,
}

/// A unit of work against a single collection.
///
/// Writes are staged and only become visible to other readers when
/// [`Transaction::commit`] replaces the collection file. Dropping a
/// transaction without committing discards its writes.
#[derive(Debug)]
pub struct Transaction<'db> {
    db: &'db Database,
    collection: String,
    schema: CollectionSchema,
    mode: TransactionMode,
    /// Snapshot taken at begin, with this transaction's puts applied
    data: CollectionData,
    staged: Vec<StagedPut>,
}

impl<'db> Transaction<'db> {
    pub(super) fn begin(db: &'db Database, collection: &str, mode: TransactionMode) -> Result<Self> {
        let schema = db
            .schema(collection)
            .cloned()
            .ok_or_else(|| ConverterError::UnknownCollection(collection.to_string()))?;

        let data = CollectionData::read(&db.collection_path(collection))?;

        Ok(Self {
            db,
            collection: collection.to_string(),
            schema,
            mode,
            data,
            staged: Vec::new(),
        })
    }

    /// Point lookup by primary key. `None` means no record has that key.
    pub fn get<T: DeserializeOwned>(&self, key: impl Into<Value>) -> Result<Option<T>> {
        match self.data.records.get(&encode_key(&key.into())) {
            Some(record) => Ok(Some(T::deserialize(record)?)),
            None => Ok(None),
        }
    }

    /// Snapshot of every record in the collection
    pub fn get_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.data
            .records
            .values()
            .map(|record| T::deserialize(record).map_err(ConverterError::from))
            .collect()
    }

    /// Number of records in the collection
    pub fn count(&self) -> usize {
        self.data.records.len()
    }

    /// Insert or replace a record by primary key, returning the key used.
    ///
    /// An auto-assigned key can still move at commit if an overlapping
    /// writer committed the same id first.
    pub fn put<T: Serialize>(&mut self, record: &T) -> Result<Value> {
        if self.mode == TransactionMode::ReadOnly {
            return Err(ConverterError::ReadOnlyTransaction(self.collection.clone()));
        }

        let mut value = serde_json::to_value(record)?;
        let object = value.as_object_mut().ok_or_else(|| {
            ConverterError::InvalidArgument(format!(
                "records in '{}' must be JSON objects",
                self.collection
            ))
        })?;

        let existing = object
            .get(&self.schema.key_path)
            .filter(|key| !key.is_null())
            .cloned();

        let (key, assigned) = match existing {
            Some(key) => (key, false),
            None if self.schema.auto_increment => {
                let key = Value::from(self.data.next_id);
                object.insert(self.schema.key_path.clone(), key.clone());
                (key, true)
            }
            None => {
                return Err(ConverterError::MissingKey {
                    collection: self.collection.clone(),
                    key_path: self.schema.key_path.clone(),
                })
            }
        };

        if self.schema.auto_increment {
            if let Some(id) = key.as_u64() {
                self.data.next_id = self.data.next_id.max(id + 1);
            }
        }

        self.data.records.insert(encode_key(&key), value.clone());
        self.staged.push(StagedPut {
            key: key.clone(),
            record: value,
            assigned,
        });
        Ok(key)
    }

    /// Persist staged writes.
    ///
    /// Puts are merged onto the collection as it is on disk now, so records
    /// committed by overlapping writers since `begin` are kept.
    pub fn commit(self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let path = self.db.collection_path(&self.collection);
        let mut current = CollectionData::read(&path)?;
        current.next_id = current.next_id.max(self.data.next_id);

        let written = self.staged.len();
        for StagedPut {
            mut key,
            mut record,
            assigned,
        } in self.staged
        {
            if assigned && current.records.contains_key(&encode_key(&key)) {
                key = Value::from(current.next_id);
                if let Some(object) = record.as_object_mut() {
                    object.insert(self.schema.key_path.clone(), key.clone());
                }
                debug!("'{}': auto key taken, reassigned {key}", self.collection);
            }
            if self.schema.auto_increment {
                if let Some(id) = key.as_u64() {
                    current.next_id = current.next_id.max(id + 1);
                }
            }
            current.records.insert(encode_key(&key), record);
        }

        let bytes = serde_json::to_vec_pretty(&current)?;
        write_atomic(&path, &bytes)?;
        debug!("committed {} put(s) to '{}'", written, self.collection);
        Ok(())
    }
}

fn encode_key(key: &Value) -> String {
    key.to_string()
}
