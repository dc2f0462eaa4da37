//! Merging a catalog into a host type checker's symbol table.

use std::collections::HashMap;

use ambient_foundation::{Error, ErrorKind, QualifiedName, Result};
use tracing::debug;

use crate::catalog::Catalog;
use crate::declaration::Declaration;

/// A symbol table that accepts ambient declarations.
pub trait HostSymbolTable {
    /// Adds one declaration.
    ///
    /// # Errors
    /// Returns an error if the host refuses the declaration, usually
    /// `DuplicateName` when the name is already bound.
    fn declare_ambient(&mut self, declaration: &Declaration) -> Result<()>;
}

fn collision(declaration: &Declaration) -> Error {
    let namespace = declaration
        .name
        .parent()
        .map_or_else(|| "<global>".to_string(), |p| p.full_name());
    Error::duplicate_name(declaration.name.simple_name(), namespace)
}

impl HostSymbolTable for im::OrdMap<String, Declaration> {
    fn declare_ambient(&mut self, declaration: &Declaration) -> Result<()> {
        let key = declaration.name.full_name();
        if self.contains_key(&key) {
            return Err(collision(declaration));
        }
        self.insert(key, declaration.clone());
        Ok(())
    }
}

impl<S: std::hash::BuildHasher> HostSymbolTable for HashMap<String, Declaration, S> {
    fn declare_ambient(&mut self, declaration: &Declaration) -> Result<()> {
        let key = declaration.name.full_name();
        if self.contains_key(&key) {
            return Err(collision(declaration));
        }
        self.insert(key, declaration.clone());
        Ok(())
    }
}

/// Outcome of [`Catalog::export_into`].
#[derive(Clone, Debug, Default)]
pub struct ExportReport {
    /// Declarations the host accepted.
    pub exported: usize,
    /// Declarations the host refused, with its reason.
    pub rejected: Vec<(QualifiedName, Error)>,
}

impl ExportReport {
    /// Returns true if the host accepted everything.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Returns the rejected names that collided with existing host symbols.
    pub fn collisions(&self) -> impl Iterator<Item = &QualifiedName> {
        self.rejected
            .iter()
            .filter(|(_, err)| matches!(err.kind, ErrorKind::DuplicateName { .. }))
            .map(|(name, _)| name)
    }
}

impl Catalog {
    /// Feeds declarations to a host symbol table in load order.
    ///
    /// Top-level declarations always go; class members follow their class
    /// when `include_members` is set. A refusal does not stop the export.
    pub fn export_into<H>(&self, host: &mut H, include_members: bool) -> ExportReport
    where
        H: HostSymbolTable + ?Sized,
    {
        let mut report = ExportReport::default();
        let declarations = if include_members {
            self.all_declarations()
        } else {
            self.declarations().collect()
        };
        for decl in declarations {
            match host.declare_ambient(decl) {
                Ok(()) => report.exported += 1,
                Err(err) => report.rejected.push((decl.name.clone(), err)),
            }
        }
        debug!(
            exported = report.exported,
            rejected = report.rejected.len(),
            "exported catalog to host"
        );
        report
    }
}
