use std::collections::BTreeMap;

use log::debug;

use super::database::CollectionSchema;
use crate::error::{ConverterError, Result};

/// One additive schema change, applied when upgrading from `from_version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub from_version: u32,
    pub step: MigrationStep,
}

/// Schema change kinds. Only additive steps exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStep {
    CreateCollection {
        name: String,
        schema: CollectionSchema,
    },
}

impl Migration {
    /// Create a collection keyed by `key_path`
    pub fn create_collection(
        from_version: u32,
        name: impl Into<String>,
        key_path: impl Into<String>,
        auto_increment: bool,
    ) -> Self {
        Self {
            from_version,
            step: MigrationStep::CreateCollection {
                name: name.into(),
                schema: CollectionSchema {
                    key_path: key_path.into(),
                    auto_increment,
                },
            },
        }
    }

    /// Apply this step to the schema map.
    ///
    /// Returns the name of a newly created collection, or `None` when the
    /// collection already existed with an identical schema.
    pub(super) fn apply(
        &self,
        collections: &mut BTreeMap<String, CollectionSchema>,
    ) -> Result<Option<String>> {
        match &self.step {
            MigrationStep::CreateCollection { name, schema } => match collections.get(name) {
                Some(existing) if existing == schema => {
                    debug!("collection '{name}' already present, skipping");
                    Ok(None)
                }
                Some(existing) => Err(ConverterError::store_open(format!(
                    "collection '{}' exists with key path '{}', migration from v{} wants '{}'",
                    name, existing.key_path, self.from_version, schema.key_path
                ))),
                None => {
                    collections.insert(name.clone(), schema.clone());
                    Ok(Some(name.clone()))
                }
            },
        }
    }
}

/// Select the steps that upgrade `stored` to `target`, in ascending order
pub(super) fn pending(migrations: &[Migration], stored: u32, target: u32) -> Vec<&Migration> {
    let mut steps: Vec<&Migration> = migrations
        .iter()
        .filter(|m| m.from_version >= stored && m.from_version < target)
        .collect();
    steps.sort_by_key(|m| m.from_version);
    steps
}
