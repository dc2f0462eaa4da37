//! Core types for ambient declaration catalogs.
//!
//! This crate provides:
//! - [`TypeExpr`] - The recursive type expression model
//! - [`QualifiedName`] - Dotted declaration paths like `https.Server.prototype.listen`
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod name;
pub mod types;

pub use error::{Error, ErrorContext, ErrorKind};
pub use name::QualifiedName;
pub use types::{
    FnParam, FunctionContext, FunctionType, KeyPrimitive, Primitive, RecordField, TypeExpr,
};

/// Result type alias using the ambient [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
