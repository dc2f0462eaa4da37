//! Sessions over fixture files

use ambient_foundation::ErrorKind;
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
fn loads_fixture_files() {
    let session = node_session();
    assert_eq!(session.origin(), Origin::Sources);
    let names: Vec<&str> = session.source_names().collect();
    assert_eq!(names, ["tls.js", "http.js", "https.js"]);
    let catalog = session.catalog().unwrap();
    assert!(catalog.resolve("https.Server.addContext").is_some());
}

#[test]
fn files_can_arrive_one_at_a_time() {
    let mut session = Session::new();
    session.set_load_path(fixtures_dir());
    session.load_files(&["https.js"]).unwrap();
    assert!(
        session
            .catalog()
            .unwrap()
            .resolve("https.Server.addContext")
            .is_none()
    );

    session.load_files(&["tls.js"]).unwrap();
    assert!(
        session
            .catalog()
            .unwrap()
            .resolve("https.Server.addContext")
            .is_some()
    );
}

#[test]
fn failed_file_leaves_session_unchanged() {
    let mut session = node_session();
    let before = session.catalog().unwrap().len();

    let err = session
        .load_source("dup.js", "/** @type {number} */\nhttps.globalAgent;")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateName { .. }));
    assert_eq!(session.catalog().unwrap().len(), before);
    assert_eq!(session.source_names().count(), 3);

    let err = session.load_files(&["missing.js"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IoError(_)));
}

#[test]
fn declared_names_include_members() {
    let session = node_session();
    let names = session.declared_names();
    assert!(names.iter().any(|n| n == "https.Server.prototype.listen"));
    assert!(names.iter().any(|n| n == "http.Agent.prototype.maxSockets"));
    assert!(Session::new().declared_names().is_empty());
}
