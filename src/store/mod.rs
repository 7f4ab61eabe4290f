//! Versioned on-disk record store
//!
//! A database is a directory holding a `meta.json` (schema version plus the
//! collection schemas) and one JSON file per collection. Schemas only ever
//! grow: migrations are additive steps keyed by the version they upgrade
//! from, and every write goes through a single-collection transaction that
//! replaces the collection file atomically on commit.

mod database;
mod migration;
mod transaction;

pub use database::{CollectionSchema, Database};
pub use migration::{Migration, MigrationStep};
pub use transaction::{Transaction, TransactionMode};

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

/// Replace `path` with `bytes` so readers see either the old or the new file.
///
/// Each write goes through its own uniquely named sibling, so concurrent
/// writers never share a temp file.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
