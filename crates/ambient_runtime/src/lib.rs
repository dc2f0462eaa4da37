//! CLI, REPL, and catalog snapshots for ambient declaration catalogs.
//!
//! This crate provides:
//! - [`Repl`] - Interactive queries against a loaded catalog
//! - [`Session`] - Sources loaded so far and the catalog built from them
//! - [`snapshot`] - Catalog snapshots in `MessagePack`
//! - [`logging`] - The `tracing` subscriber used by the binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod editor;
pub mod highlight;
pub mod logging;
pub mod render;
pub mod repl;
pub mod session;
pub mod snapshot;

pub use command::Command;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::{Outcome, Repl};
pub use session::{Origin, Session};
