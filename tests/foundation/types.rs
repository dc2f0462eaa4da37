//! Integration tests for TypeExpr construction and display

use ambient_foundation::{
    FnParam, FunctionContext, FunctionType, KeyPrimitive, Primitive, RecordField, TypeExpr,
};

fn string() -> TypeExpr {
    TypeExpr::Primitive(Primitive::String)
}

fn number() -> TypeExpr {
    TypeExpr::Primitive(Primitive::Number)
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn union_flattens_nested_unions() {
    let inner = TypeExpr::union(vec![string(), number()]);
    let outer = TypeExpr::union(vec![inner, TypeExpr::named("buffer.Buffer")]);
    assert_eq!(
        outer,
        TypeExpr::Union(vec![string(), number(), TypeExpr::named("buffer.Buffer")])
    );
}

#[test]
fn single_member_union_collapses() {
    assert_eq!(TypeExpr::union(vec![string()]), string());
}

#[test]
fn void_is_undefined() {
    assert_eq!(Primitive::from_name("void"), Some(Primitive::Undefined));
    assert_eq!(Primitive::from_name("Object"), None);
}

#[test]
fn map_keys_are_string_or_number() {
    assert_eq!(
        KeyPrimitive::from_primitive(Primitive::String),
        Some(KeyPrimitive::String)
    );
    assert_eq!(KeyPrimitive::from_primitive(Primitive::Boolean), None);
}

#[test]
fn nullability() {
    assert!(TypeExpr::nullable(string()).is_nullable());
    assert!(TypeExpr::Any.is_nullable());
    assert!(TypeExpr::union(vec![string(), TypeExpr::Primitive(Primitive::Null)]).is_nullable());
    assert!(!TypeExpr::named("https.Agent").is_nullable());
}

// =============================================================================
// Display
// =============================================================================

#[test]
fn display_nullable_union_is_parenthesized() {
    let ty = TypeExpr::nullable(TypeExpr::union(vec![
        TypeExpr::named("https.Agent"),
        TypeExpr::Primitive(Primitive::Boolean),
    ]));
    assert_eq!(ty.to_string(), "?(https.Agent|boolean)");
}

#[test]
fn display_collections() {
    assert_eq!(TypeExpr::array_of(string()).to_string(), "Array<string>");
    assert_eq!(
        TypeExpr::map_of(KeyPrimitive::String, string()).to_string(),
        "Object<string, string>"
    );
    assert_eq!(
        TypeExpr::Applied("Promise".into(), vec![number()]).to_string(),
        "Promise<number>"
    );
}

#[test]
fn display_function_with_context_and_modifiers() {
    let func = TypeExpr::Function(FunctionType {
        context: Some(FunctionContext::This(Box::new(TypeExpr::named("https.Server")))),
        params: vec![
            FnParam::required(TypeExpr::named("http.IncomingMessage")),
            FnParam {
                ty: TypeExpr::Any,
                optional: false,
                variadic: true,
            },
        ],
        return_type: Box::new(TypeExpr::Primitive(Primitive::Boolean)),
    });
    assert_eq!(
        func.to_string(),
        "function(this:https.Server, http.IncomingMessage, ...*): boolean"
    );
    assert!(func.as_function().unwrap().is_variadic());
}

#[test]
fn display_record_marks_non_null_fields() {
    let record = TypeExpr::Record(vec![
        RecordField {
            name: "host".into(),
            ty: string(),
            nullable: true,
        },
        RecordField {
            name: "port".into(),
            ty: number(),
            nullable: false,
        },
    ]);
    assert_eq!(record.to_string(), "{host: string, port: !number}");
    assert!(record.record_field("port").is_some());
    assert!(record.record_field("path").is_none());
}

#[test]
fn visit_names_walks_every_reference() {
    let ty = TypeExpr::union(vec![
        TypeExpr::named("https.ConnectOptions"),
        TypeExpr::Function(FunctionType {
            context: None,
            params: vec![FnParam::required(TypeExpr::named("http.IncomingMessage"))],
            return_type: Box::new(TypeExpr::array_of(TypeExpr::named("buffer.Buffer"))),
        }),
    ]);
    let mut names = Vec::new();
    ty.visit_names(&mut |n| names.push(n.to_string()));
    assert_eq!(
        names,
        ["https.ConnectOptions", "http.IncomingMessage", "buffer.Buffer"]
    );
}
