//! typeOf over the node fixtures

use ambient_catalog::{CallSuffix, Catalog, Reference};
use ambient_foundation::{ErrorKind, Primitive, TypeExpr};

use crate::fixtures::node_catalog;

fn string() -> TypeExpr {
    TypeExpr::Primitive(Primitive::String)
}

#[test]
fn request_options_union_keeps_named_member() {
    let catalog = node_catalog();
    let ty = catalog.type_of("https.request(options)").unwrap();
    assert_eq!(
        ty,
        TypeExpr::Union(vec![TypeExpr::named("https.ConnectOptions"), string()])
    );
    assert_eq!(catalog.type_of("https.request(0)").unwrap(), ty);
}

#[test]
fn connect_options_expand_to_nullable_record() {
    let catalog = node_catalog();
    let record = catalog.expand(&TypeExpr::named("https.ConnectOptions")).unwrap();
    let TypeExpr::Record(fields) = &record else {
        panic!("expected record, got {record:?}");
    };
    assert_eq!(fields.len(), 15);
    assert!(fields.iter().all(|f| f.nullable));
    assert_eq!(catalog.type_of("https.ConnectOptions").unwrap(), record);
}

#[test]
fn return_types() {
    let catalog = node_catalog();
    assert_eq!(
        catalog.type_of("https.request()").unwrap(),
        TypeExpr::named("http.ClientRequest")
    );
    assert_eq!(
        catalog.type_of("tls.createServer()").unwrap(),
        TypeExpr::named("tls.Server")
    );
}

#[test]
fn parameter_typed_by_typedef_in_another_file() {
    let catalog = node_catalog();
    let options = catalog.type_of("https.createServer(options)").unwrap();
    assert_eq!(
        options.record_field("ca").unwrap().ty,
        TypeExpr::nullable(TypeExpr::array_of(string()))
    );
}

#[test]
fn stepping_through_records_and_members() {
    let catalog = node_catalog();
    assert_eq!(
        catalog.type_of("https.ConnectOptions.port").unwrap(),
        TypeExpr::nullable(TypeExpr::Primitive(Primitive::Number))
    );
    assert_eq!(
        catalog.type_of("https.globalAgent.maxSockets").unwrap(),
        TypeExpr::Primitive(Primitive::Number)
    );
    assert_eq!(
        catalog.type_of("tls.CreateOptions.ca").unwrap().to_string(),
        "?Array<string>"
    );
}

#[test]
fn methods_and_constructors_display() {
    let catalog = node_catalog();
    assert_eq!(
        catalog.type_of("https.Server.prototype.listen").unwrap().to_string(),
        "function(...*)"
    );
    assert_eq!(
        catalog.type_of("https.Server").unwrap().to_string(),
        "function(new:https.Server)"
    );
    assert_eq!(
        catalog.type_of("https.createServer(1)").unwrap().to_string(),
        "function(http.IncomingMessage, http.ServerResponse)"
    );
}

#[test]
fn inherited_method_parameter() {
    let catalog = node_catalog();
    let credentials = catalog.type_of("https.Server.addContext(credentials)").unwrap();
    assert_eq!(credentials.to_string(), "{key: string, cert: string, ca: string}");
}

#[test]
fn misses_are_not_found() {
    let catalog = node_catalog();
    for expr in [
        "https.nope",
        "https.request(nope)",
        "https.request(5)",
        "https.ConnectOptions.nope",
        "https.globalAgent.nope",
        "https.request.nope",
    ] {
        let err = catalog.type_of(expr).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NotFound(_)), "{expr}: {err:?}");
    }
}

#[test]
fn bad_syntax_is_parse_error() {
    let catalog = node_catalog();
    for expr in ["https.request(", "https..get", "https.request(a b)"] {
        let err = catalog.type_of(expr).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ParseError { .. }), "{expr}: {err:?}");
    }
}

#[test]
fn parsed_references_evaluate_the_same() {
    let catalog = node_catalog();
    let reference = Reference::parse("https.get(callback)").unwrap();
    assert_eq!(reference.call, Some(CallSuffix::Param("callback".into())));
    assert_eq!(
        catalog.type_of_reference(&reference).unwrap(),
        catalog.type_of("https.get(callback)").unwrap()
    );
}

#[test]
fn cycle_fails_only_that_call() {
    let source = "var t = {};\n\
        /** @typedef {t.B} */\nt.A;\n\
        /** @typedef {t.A} */\nt.B;\n\
        /** @type {number} */\nt.n;";
    let catalog = Catalog::load("t.js", source).unwrap();
    let err = catalog.type_of("t.A").unwrap_err();
    let ErrorKind::CyclicTypedef { cycle } = err.kind else {
        panic!("expected cycle, got {err:?}");
    };
    assert_eq!(cycle, ["t.A", "t.B", "t.A"]);
    assert_eq!(
        catalog.type_of("t.n").unwrap(),
        TypeExpr::Primitive(Primitive::Number)
    );
}
