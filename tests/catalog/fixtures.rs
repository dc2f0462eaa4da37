//! Shared externs sources.

use ambient_catalog::{Catalog, CatalogBuilder};

pub const TLS: &str = include_str!("../fixtures/tls.js");
pub const HTTP: &str = include_str!("../fixtures/http.js");
pub const HTTPS: &str = include_str!("../fixtures/https.js");

/// Builds a catalog from the three node fixtures.
pub fn node_catalog() -> Catalog {
    CatalogBuilder::new()
        .source("tls.js", TLS)
        .source("http.js", HTTP)
        .source("https.js", HTTPS)
        .build()
        .unwrap()
}
