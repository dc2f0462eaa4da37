//! Catalog snapshots using `MessagePack`.
//!
//! A snapshot lets a host skip parsing: the catalog is built once, saved,
//! and later loaded straight into memory. Snapshots carry a format version
//! and are rejected when it does not match.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use ambient_catalog::Catalog;
use ambient_foundation::{Error, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version written into every snapshot.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    catalog: &'a Catalog,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    catalog: Catalog,
}

fn serialization_error(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::SerializationError(message.into()))
}

fn io_error(action: &str, path: &Path, err: &std::io::Error) -> Error {
    Error::new(ErrorKind::IoError(format!(
        "failed to {action} '{}': {err}",
        path.display()
    )))
}

/// Serializes a catalog to `MessagePack` bytes.
///
/// Uses named serialization to preserve struct field names.
///
/// # Errors
///
/// Returns `SerializationError` if encoding fails.
pub fn to_bytes(catalog: &Catalog) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&SnapshotRef {
        version: FORMAT_VERSION,
        catalog,
    })
    .map_err(|e| serialization_error(e.to_string()))
}

/// Deserializes a catalog from `MessagePack` bytes.
///
/// # Errors
///
/// Returns `SerializationError` if decoding fails or the snapshot was
/// written with another format version.
pub fn from_bytes(bytes: &[u8]) -> Result<Catalog> {
    let snapshot: Snapshot =
        rmp_serde::from_slice(bytes).map_err(|e| serialization_error(e.to_string()))?;
    if snapshot.version != FORMAT_VERSION {
        return Err(serialization_error(format!(
            "snapshot format {} is not supported (expected {FORMAT_VERSION})",
            snapshot.version
        )));
    }
    Ok(snapshot.catalog)
}

/// Saves a catalog snapshot to a file, overwriting it if present.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be written, or
/// `SerializationError` if encoding fails.
pub fn save_to_file<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = to_bytes(catalog)?;

    let file = File::create(path).map_err(|e| io_error("create file", path, &e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&bytes)
        .map_err(|e| io_error("write to file", path, &e))?;
    writer
        .flush()
        .map_err(|e| io_error("flush file", path, &e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "saved catalog snapshot");
    Ok(())
}

/// Loads a catalog snapshot from a file.
///
/// # Errors
///
/// Returns `IoError` if the file cannot be read, or `SerializationError`
/// if decoding fails.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error("open file", path, &e))?;

    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io_error("read file", path, &e))?;

    let catalog = from_bytes(&bytes)?;
    debug!(path = %path.display(), declarations = catalog.len(), "loaded catalog snapshot");
    Ok(catalog)
}
