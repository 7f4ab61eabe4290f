use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::migration::{self, Migration};
use super::transaction::{CollectionData, Transaction, TransactionMode};
use super::write_atomic;
use crate::error::{ConverterError, Result};

const META_FILE: &str = "meta.json";

/// How records in a collection are keyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSchema {
    /// Field holding the primary key
    pub key_path: String,
    /// Assign integer keys to records that arrive without one
    #[serde(default)]
    pub auto_increment: bool,
}

/// Persisted database metadata
#[derive(Debug, Default, Serialize, Deserialize)]
struct Meta {
    version: u32,
    #[serde(default)]
    collections: BTreeMap<String, CollectionSchema>,
}

/// Handle to an open, fully migrated database
#[derive(Debug, Clone)]
pub struct Database {
    dir: PathBuf,
    name: String,
    version: u32,
    collections: BTreeMap<String, CollectionSchema>,
}

impl Database {
    /// Open (creating if absent) the database `name` under `root`.
    ///
    /// Every migration whose origin version is at or above the stored
    /// version and below `target_version` runs in ascending order before
    /// the new version is persisted. No handle is returned if any step
    /// fails.
    pub fn open(
        root: &Path,
        name: &str,
        target_version: u32,
        migrations: &[Migration],
    ) -> Result<Self> {
        let dir = root.join(name);
        fs::create_dir_all(&dir).map_err(ConverterError::store_open)?;

        let meta_path = dir.join(META_FILE);
        let mut meta = read_meta(&meta_path)?;

        if meta.version > target_version {
            return Err(ConverterError::store_open(format!(
                "'{}' is at version {}, newer than supported version {}",
                name, meta.version, target_version
            )));
        }

        if meta.version < target_version {
            info!(
                "upgrading store '{}' from v{} to v{}",
                name, meta.version, target_version
            );
            for step in migration::pending(migrations, meta.version, target_version) {
                if let Some(created) = step.apply(&mut meta.collections)? {
                    create_collection_file(&dir.join(collection_file(&created)))?;
                    debug!("created collection '{created}'");
                }
            }

            meta.version = target_version;
            let bytes = serde_json::to_vec_pretty(&meta).map_err(ConverterError::store_open)?;
            write_atomic(&meta_path, &bytes).map_err(ConverterError::store_open)?;
        }

        Ok(Self {
            dir,
            name: name.to_string(),
            version: meta.version,
            collections: meta.collections,
        })
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema version currently on disk
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Directory holding the database files
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Names of all collections, sorted
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Schema of a collection, if it exists
    pub fn schema(&self, collection: &str) -> Option<&CollectionSchema> {
        self.collections.get(collection)
    }

    /// Begin a transaction scoped to one collection
    pub fn transaction(&self, collection: &str, mode: TransactionMode) -> Result<Transaction<'_>> {
        Transaction::begin(self, collection, mode)
    }

    pub(super) fn collection_path(&self, collection: &str) -> PathBuf {
        self.dir.join(collection_file(collection))
    }
}

fn collection_file(collection: &str) -> String {
    format!("{collection}.json")
}

fn read_meta(path: &Path) -> Result<Meta> {
    if !path.exists() {
        return Ok(Meta::default());
    }
    let contents = fs::read_to_string(path).map_err(ConverterError::store_open)?;
    serde_json::from_str(&contents).map_err(ConverterError::store_open)
}

/// Existing files are left untouched so a re-run never drops records
fn create_collection_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    let bytes =
        serde_json::to_vec_pretty(&CollectionData::default()).map_err(ConverterError::store_open)?;
    write_atomic(path, &bytes).map_err(ConverterError::store_open)
}
