//! Catalog lifecycle.
//!
//! A [`CatalogLoader`] moves through `Unloaded -> Loading -> Loaded | Failed`.
//! Both end states are terminal. Queries are only answered once loaded.

use std::fmt;
use std::sync::Arc;

use ambient_foundation::{Error, Result, TypeExpr};
use tracing::{debug, warn};

use crate::builder::{CatalogBuilder, LoadOptions};
use crate::catalog::Catalog;
use crate::declaration::Declaration;

/// Where a loader is in its lifecycle.
#[derive(Clone, Debug, Default)]
pub enum LoadState {
    /// Nothing loaded yet.
    #[default]
    Unloaded,
    /// Sources are being parsed and lowered.
    Loading,
    /// The catalog is ready for queries.
    Loaded(Arc<Catalog>),
    /// The load failed; no partial catalog exists.
    Failed(Error),
}

impl LoadState {
    /// Returns the state name used in `InvalidState` errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Loads a catalog once and answers queries against it.
#[derive(Clone, Debug, Default)]
pub struct CatalogLoader {
    options: LoadOptions,
    state: LoadState,
}

impl CatalogLoader {
    /// Creates an unloaded loader with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an unloaded loader with the given options.
    #[must_use]
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            state: LoadState::Unloaded,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the current state's name.
    #[must_use]
    pub const fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// Returns true once a catalog is available.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    /// Loads a single named source.
    ///
    /// # Errors
    /// See [`CatalogLoader::load_sources`].
    pub fn load(&mut self, name: &str, source: &str) -> Result<Arc<Catalog>> {
        self.load_sources([(name, source)])
    }

    /// Loads several named sources into one catalog.
    ///
    /// # Errors
    /// Returns `InvalidState` unless the loader is unloaded, otherwise the
    /// load error, which is also kept as the `Failed` state.
    pub fn load_sources<I, N, T>(&mut self, sources: I) -> Result<Arc<Catalog>>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        if !matches!(self.state, LoadState::Unloaded) {
            return Err(Error::invalid_state("unloaded", self.state_name()));
        }
        self.state = LoadState::Loading;

        let mut builder = CatalogBuilder::new().options(self.options);
        for (name, text) in sources {
            builder.add_source(name, text);
        }
        debug!(sources = builder.source_count(), "loading catalog");

        match builder.build() {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                debug!(declarations = catalog.len(), "catalog loaded");
                self.state = LoadState::Loaded(Arc::clone(&catalog));
                Ok(catalog)
            }
            Err(err) => {
                warn!(error = %err, "catalog load failed");
                self.state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Returns the loaded catalog.
    ///
    /// # Errors
    /// Returns `InvalidState` unless loaded.
    pub fn catalog(&self) -> Result<&Arc<Catalog>> {
        match &self.state {
            LoadState::Loaded(catalog) => Ok(catalog),
            other => Err(Error::invalid_state("loaded", other.name())),
        }
    }

    /// Returns the load error of a failed loader.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match &self.state {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Resolves a dotted name against the loaded catalog.
    ///
    /// # Errors
    /// Returns `InvalidState` unless loaded.
    pub fn resolve(&self, name: &str) -> Result<Option<&Declaration>> {
        Ok(self.catalog()?.resolve(name))
    }

    /// Evaluates a reference expression against the loaded catalog.
    ///
    /// # Errors
    /// Returns `InvalidState` unless loaded, otherwise as
    /// [`Catalog::type_of`].
    pub fn type_of(&self, expression: &str) -> Result<TypeExpr> {
        self.catalog()?.type_of(expression)
    }
}
