//! Immutable catalog of ambient declarations.
//!
//! This crate provides:
//! - [`CatalogBuilder`] - Lowers externs sources into declarations
//! - [`Catalog`] - Name resolution, member lookup and `typeOf` queries
//! - [`CatalogLoader`] - The load lifecycle and its state checks
//! - [`HostSymbolTable`] - The seam for merging into a host type checker

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod catalog;
pub mod declaration;
pub mod global;
pub mod host;
pub mod loader;
pub mod type_of;

pub use builder::{CatalogBuilder, LoadOptions};
pub use catalog::{Catalog, MemberRef, SourceInfo, UnresolvedReference};
pub use declaration::{
    ClassDeclaration, Declaration, DeclarationKind, DocInfo, FunctionSignature, Parameter,
    SuperRef, SuperStatus, VariableDeclaration,
};
pub use host::{ExportReport, HostSymbolTable};
pub use loader::{CatalogLoader, LoadState};
pub use type_of::{CallSuffix, Reference};
