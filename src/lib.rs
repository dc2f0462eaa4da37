//! Ambient - declaration catalog for externs files
//!
//! This crate re-exports all layers of the system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: ambient_runtime    - CLI, REPL, catalog snapshots
//! Layer 2: ambient_catalog    - Catalog construction, resolution, typeOf, lifecycle
//! Layer 1: ambient_language   - Lexer, statement, doc-comment and type parsers
//! Layer 0: ambient_foundation - Core types (TypeExpr, QualifiedName, Error)
//! ```

pub use ambient_catalog as catalog;
pub use ambient_foundation as foundation;
pub use ambient_language as language;
pub use ambient_runtime as runtime;
