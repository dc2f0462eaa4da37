//! Snapshot round trips of the fixture catalog

use ambient_foundation::ErrorKind;
use ambient_runtime::snapshot;
use ambient_runtime::{Origin, Session};

use crate::fixtures_dir;

fn node_session() -> Session {
    let mut session = Session::new();
    session.set_load_path(fixtures_dir());
    session
        .load_files(&["tls.js", "http.js", "https.js"])
        .unwrap();
    session
}

#[test]
fn bytes_round_trip_keeps_every_declaration() {
    let session = node_session();
    let catalog = session.catalog().unwrap();
    let bytes = snapshot::to_bytes(catalog).unwrap();
    let restored = snapshot::from_bytes(&bytes).unwrap();

    assert_eq!(restored.all_declarations(), catalog.all_declarations());
    assert_eq!(restored.module_binding("tls"), Some("tls"));
    assert_eq!(
        restored.type_of("https.request(options)").unwrap(),
        catalog.type_of("https.request(options)").unwrap()
    );
    assert_eq!(
        restored.resolve("https.Server.addContext").unwrap().name.full_name(),
        "tls.Server.prototype.addContext"
    );
}

#[test]
fn snapshot_file_feeds_a_read_only_session() {
    let session = node_session();
    let path = std::env::temp_dir().join(format!(
        "ambient_runtime_it_{}.msgpack",
        std::process::id()
    ));
    session.save_snapshot(&path).unwrap();

    let mut restored = Session::new();
    let catalog = restored.load_snapshot(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(restored.origin(), Origin::Snapshot);
    assert_eq!(catalog.len(), session.catalog().unwrap().len());
    assert_eq!(restored.source_names().count(), 0);

    let err = restored.load_source("more.js", "var more = {};").unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidState {
            expected: "sources",
            actual: "snapshot"
        }
    ));
}

#[test]
fn truncated_snapshot_is_rejected() {
    let session = node_session();
    let bytes = snapshot::to_bytes(session.catalog().unwrap()).unwrap();
    let err = snapshot::from_bytes(&bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}
