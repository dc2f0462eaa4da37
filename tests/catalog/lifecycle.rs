//! The loader state machine and the process-wide slot

use std::sync::Arc;
use std::thread;

use ambient_catalog::{CatalogBuilder, CatalogLoader, LoadState, global};
use ambient_foundation::{ErrorKind, TypeExpr};

use crate::fixtures::{HTTP, HTTPS, TLS};

#[test]
fn loads_then_answers_queries() {
    let mut loader = CatalogLoader::new();
    assert_eq!(loader.state_name(), "unloaded");

    let catalog = loader
        .load_sources([("tls.js", TLS), ("http.js", HTTP), ("https.js", HTTPS)])
        .unwrap();
    assert!(loader.is_loaded());
    assert!(Arc::ptr_eq(&catalog, loader.catalog().unwrap()));
    assert!(loader.resolve("https.Server.addContext").unwrap().is_some());
    assert_eq!(
        loader.type_of("https.request()").unwrap(),
        TypeExpr::named("http.ClientRequest")
    );
}

#[test]
fn failure_is_terminal_and_kept() {
    let mut loader = CatalogLoader::new();
    let source = format!("{HTTPS}\n/** @constructor */\nhttps.Agent = function() {{}};\n");
    let err = loader.load("https.js", &source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName { .. }));

    assert!(matches!(loader.state(), LoadState::Failed(_)));
    assert_eq!(loader.error().map(|e| &e.kind), Some(&err.kind));

    let again = loader.load("https.js", HTTPS).unwrap_err();
    assert!(matches!(
        again.kind,
        ErrorKind::InvalidState {
            expected: "unloaded",
            actual: "failed"
        }
    ));
    let query = loader.resolve("https").unwrap_err();
    assert!(matches!(
        query.kind,
        ErrorKind::InvalidState {
            expected: "loaded",
            actual: "failed"
        }
    ));
}

#[test]
fn loaded_is_terminal() {
    let mut loader = CatalogLoader::new();
    loader.load("https.js", HTTPS).unwrap();
    let err = loader.load("tls.js", TLS).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidState { actual: "loaded", .. }));
    assert!(loader.resolve("https.Server").unwrap().is_some());
}

#[test]
fn shared_catalog_reads_from_many_threads() {
    let builder = CatalogBuilder::new()
        .source("tls.js", TLS)
        .source("http.js", HTTP)
        .source("https.js", HTTPS);
    let catalog = global::get_or_build(&builder).unwrap();
    assert!(Arc::ptr_eq(&catalog, &global::get().unwrap()));
    assert!(global::install(Arc::clone(&catalog)).is_err());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let catalog = global::get().unwrap();
                catalog.type_of("https.globalAgent.maxSockets").unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            TypeExpr::Primitive(ambient_foundation::Primitive::Number)
        );
    }
}
