//! Integration tests for the type expression grammar

use ambient_foundation::{ErrorKind, FunctionContext, Primitive, TypeExpr};
use ambient_language::{parse_param_type, parse_type};

fn string() -> TypeExpr {
    TypeExpr::Primitive(Primitive::String)
}

#[test]
fn fixture_connect_options_record() {
    let ty = parse_type(
        "{host: ?string, port: ?number, headers: ?Object.<string,string>, \
         agent: ?(https.Agent|boolean), ca: ?Array.<string>}",
    )
    .unwrap();
    let TypeExpr::Record(fields) = &ty else {
        panic!("expected record, got {ty:?}");
    };
    assert_eq!(fields.len(), 5);
    assert!(fields.iter().all(|f| f.nullable));
    assert_eq!(
        ty.record_field("ca").unwrap().ty,
        TypeExpr::nullable(TypeExpr::array_of(string()))
    );
}

#[test]
fn constructor_function_type() {
    let ty = parse_type("function(new:https.Agent, string)").unwrap();
    let func = ty.as_function().unwrap();
    assert_eq!(
        func.context,
        Some(FunctionContext::New(Box::new(TypeExpr::named("https.Agent"))))
    );
    assert_eq!(func.params.len(), 1);
}

#[test]
fn generic_application_of_named_type() {
    let ty = parse_type("Promise.<string>").unwrap();
    assert_eq!(ty, TypeExpr::Applied("Promise".into(), vec![string()]));
}

#[test]
fn optional_callback_param() {
    let param = parse_param_type("function(http.IncomingMessage, http.ServerResponse)=").unwrap();
    assert!(param.optional);
    assert_eq!(param.expr.as_function().unwrap().params.len(), 2);
}

#[test]
fn display_round_trips_fixture_types() {
    for text in [
        "?(https.Agent|boolean)",
        "function(http.IncomingMessage): http.ClientRequest",
        "Object<string, string>",
    ] {
        let ty = parse_type(text).unwrap();
        assert_eq!(ty.to_string(), text);
        assert_eq!(parse_type(&ty.to_string()).unwrap(), ty);
    }
}

#[test]
fn rejects_bad_types() {
    for text in ["function(string", "{port: }", "Array.<>", "a||b"] {
        let err = parse_type(text).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::MalformedDeclaration(_)),
            "{text:?} gave {err:?}"
        );
    }
}
