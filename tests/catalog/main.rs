//! Integration tests for Layer 2: Catalog
//!
//! Tests for loading, resolution, typeOf, the loader lifecycle, and the
//! host export seam.

mod fixtures;
mod host;
mod lifecycle;
mod load;
mod resolve;
mod type_of;
