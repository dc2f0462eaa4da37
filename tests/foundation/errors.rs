//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use ambient_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_malformed_declaration() {
    let err = Error::malformed("variadic parameter must be last");
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));
    assert!(format!("{err}").contains("variadic parameter must be last"));
}

#[test]
fn error_duplicate_name_names_namespace() {
    let err = Error::duplicate_name("Server", "https");
    let msg = format!("{err}");
    assert!(msg.contains("Server"));
    assert!(msg.contains("https"));
}

#[test]
fn error_cyclic_typedef_keeps_chain() {
    let err = Error::cyclic_typedef(vec!["A".into(), "B".into(), "A".into()]);
    match &err.kind {
        ErrorKind::CyclicTypedef { cycle } => assert_eq!(cycle, &["A", "B", "A"]),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn error_invalid_state() {
    let err = Error::invalid_state("loaded", "failed");
    let msg = format!("{err}");
    assert!(msg.contains("expected loaded"));
    assert!(msg.contains("found failed"));
}

#[test]
fn error_parse_error_position() {
    let err = Error::new(ErrorKind::ParseError {
        message: "unterminated comment".into(),
        line: 12,
        column: 3,
    });
    assert_eq!(format!("{err}"), "parse error at 12:3: unterminated comment");
}

// =============================================================================
// Error Classification
// =============================================================================

#[test]
fn only_parse_time_errors_abort_loads() {
    let parse = Error::new(ErrorKind::ParseError {
        message: String::new(),
        line: 1,
        column: 1,
    });
    assert!(parse.is_load_error());
    assert!(Error::malformed("x").is_load_error());
    assert!(Error::duplicate_name("x", "y").is_load_error());

    assert!(!Error::not_found("x").is_load_error());
    assert!(!Error::cyclic_typedef(vec![]).is_load_error());
    assert!(!Error::invalid_state("a", "b").is_load_error());
    assert!(!Error::new(ErrorKind::SerializationError("x".into())).is_load_error());
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn in_source_fills_missing_context() {
    let err = Error::malformed("bad").in_source("https.js");
    let ctx = err.context.unwrap();
    assert_eq!(ctx.source.as_deref(), Some("https.js"));
    assert_eq!(ctx.line, None);
}

#[test]
fn in_source_keeps_position() {
    let err = Error::malformed("bad")
        .with_context(ErrorContext::new().with_position(4, 9))
        .in_source("tls.js");
    let ctx = err.context.unwrap();
    assert_eq!(format!("{ctx}"), "at tls.js:4:9");
}

#[test]
fn errors_are_std_errors() {
    fn takes_std_error(_: &dyn std::error::Error) {}
    takes_std_error(&Error::not_found("https.nope"));
}
