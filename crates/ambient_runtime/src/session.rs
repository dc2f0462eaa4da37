//! Session state for the CLI and REPL.
//!
//! A session owns the declaration sources loaded so far and the catalog
//! built from them. Loading more files rebuilds the catalog from every
//! source; a failed rebuild leaves the previous catalog in place.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ambient_catalog::{Catalog, CatalogLoader, LoadOptions};
use ambient_foundation::{Error, ErrorKind, Result};
use tracing::{debug, info};

use crate::snapshot;

/// Where the session's catalog came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Nothing loaded yet.
    Empty,
    /// Built from declaration sources.
    Sources,
    /// Read from a snapshot; no sources to rebuild from.
    Snapshot,
}

/// Session state for a CLI run or REPL session.
pub struct Session {
    /// Options used for every rebuild.
    options: LoadOptions,

    /// Named source texts, in load order.
    sources: Vec<(String, String)>,

    /// The current catalog, if anything has been loaded.
    catalog: Option<Arc<Catalog>>,

    /// How the current catalog was produced.
    origin: Origin,

    /// Base directory for relative paths.
    load_path: PathBuf,
}

impl Session {
    /// Creates an empty session with default load options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LoadOptions::default())
    }

    /// Creates an empty session with the given load options.
    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            sources: Vec::new(),
            catalog: None,
            origin: Origin::Empty,
            load_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Returns the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if nothing has been loaded.
    pub fn catalog(&self) -> Result<&Arc<Catalog>> {
        self.catalog
            .as_ref()
            .ok_or_else(|| Error::invalid_state("loaded", "unloaded"))
    }

    /// Returns how the current catalog was produced.
    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    /// Returns the names of the loaded sources.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the current load path.
    #[must_use]
    pub const fn load_path(&self) -> &PathBuf {
        &self.load_path
    }

    /// Sets the load path.
    pub fn set_load_path(&mut self, path: PathBuf) {
        self.load_path = path;
    }

    /// Resolves a path relative to the current load path.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.load_path.join(p)
        }
    }

    /// Adds a named source and rebuilds the catalog.
    ///
    /// # Errors
    ///
    /// Returns the load error; the session is unchanged in that case.
    pub fn load_source(&mut self, name: impl Into<String>, text: impl Into<String>) -> Result<Arc<Catalog>> {
        self.load_sources(vec![(name.into(), text.into())])
    }

    /// Reads files and rebuilds the catalog with them added.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if a file cannot be read, otherwise the load
    /// error. The session is unchanged on error.
    pub fn load_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Arc<Catalog>> {
        let mut added = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let resolved = self.load_path.join(path);
            let text = fs::read_to_string(&resolved).map_err(|e| {
                Error::new(ErrorKind::IoError(format!(
                    "failed to read {}: {e}",
                    resolved.display()
                )))
            })?;
            added.push((path.display().to_string(), text));
        }
        self.load_sources(added)
    }

    fn load_sources(&mut self, added: Vec<(String, String)>) -> Result<Arc<Catalog>> {
        if self.origin == Origin::Snapshot {
            return Err(Error::invalid_state("sources", "snapshot"));
        }

        let mut sources = self.sources.clone();
        sources.extend(added);

        let mut loader = CatalogLoader::with_options(self.options);
        let catalog = loader.load_sources(sources.iter().map(|(n, t)| (n.as_str(), t.as_str())))?;

        info!(
            sources = sources.len(),
            declarations = catalog.len(),
            "catalog rebuilt"
        );
        self.sources = sources;
        self.catalog = Some(Arc::clone(&catalog));
        self.origin = Origin::Sources;
        Ok(catalog)
    }

    /// Replaces the session with a catalog read from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `IoError` or `SerializationError` from the snapshot reader.
    pub fn load_snapshot<P: AsRef<Path>>(&mut self, path: P) -> Result<Arc<Catalog>> {
        let catalog = Arc::new(snapshot::load_from_file(path)?);
        self.sources.clear();
        self.catalog = Some(Arc::clone(&catalog));
        self.origin = Origin::Snapshot;
        Ok(catalog)
    }

    /// Writes the current catalog as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if nothing is loaded, otherwise the snapshot
    /// writer's error.
    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        snapshot::save_to_file(self.catalog()?, path)?;
        debug!(path = %path.display(), "snapshot written");
        Ok(())
    }

    /// Every declared name, members included, for completion.
    #[must_use]
    pub fn declared_names(&self) -> Vec<String> {
        self.catalog
            .as_ref()
            .map(|c| c.all_declarations().iter().map(|d| d.name.full_name()).collect())
            .unwrap_or_default()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
