//! Process-wide catalog slot.
//!
//! A host that loads its ambient declarations once at startup can install
//! the catalog here and read it from any thread afterwards.

use std::sync::{Arc, OnceLock};

use ambient_foundation::{Error, Result};

use crate::builder::CatalogBuilder;
use crate::catalog::Catalog;

static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();

/// Installs the process-wide catalog.
///
/// # Errors
/// Returns `InvalidState` if a catalog is already installed.
pub fn install(catalog: Arc<Catalog>) -> Result<()> {
    CATALOG
        .set(catalog)
        .map_err(|_| Error::invalid_state("unloaded", "loaded"))
}

/// Returns the installed catalog, if any.
#[must_use]
pub fn get() -> Option<Arc<Catalog>> {
    CATALOG.get().cloned()
}

/// Returns the installed catalog, building and installing it first if the
/// slot is empty.
///
/// # Errors
/// Returns the build error; the slot stays empty in that case.
pub fn get_or_build(builder: &CatalogBuilder) -> Result<Arc<Catalog>> {
    if let Some(catalog) = CATALOG.get() {
        return Ok(Arc::clone(catalog));
    }
    let built = Arc::new(builder.build()?);
    // Another thread may have won the race; keep whichever landed first.
    Ok(Arc::clone(CATALOG.get_or_init(|| built)))
}
