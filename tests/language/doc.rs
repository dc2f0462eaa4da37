//! Integration tests for doc comment extraction

use ambient_foundation::{ErrorKind, TypeExpr};
use ambient_language::{DocComment, Span, Tag};

fn doc(body: &str) -> DocComment {
    DocComment::parse(body, Span::new(0, body.len(), 1, 1)).unwrap()
}

#[test]
fn request_doc_comment() {
    let d = doc(concat!(
        "\n * Issues a request.\n",
        " * @param {https.ConnectOptions|string} options\n",
        " * @param {function(http.IncomingMessage)} callback\n",
        " * @return {http.ClientRequest}\n ",
    ));
    assert_eq!(d.description, "Issues a request.");
    let params: Vec<_> = d.params().collect();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0].name.as_deref(), Some("options"));
    assert_eq!(
        params[0].ty.as_ref().unwrap().expr,
        TypeExpr::union(vec![
            TypeExpr::named("https.ConnectOptions"),
            TypeExpr::Primitive(ambient_foundation::Primitive::String),
        ])
    );
    let ret = d.find(&Tag::Return).unwrap();
    assert_eq!(
        ret.ty.as_ref().unwrap().expr,
        TypeExpr::named("http.ClientRequest")
    );
}

#[test]
fn variadic_param() {
    let d = doc("\n * @param {...*} var_args\n ");
    let param = d.params().next().unwrap();
    let ty = param.ty.as_ref().unwrap();
    assert!(ty.variadic);
    assert!(!ty.optional);
    assert_eq!(ty.expr, TypeExpr::Any);
}

#[test]
fn extends_accepts_bare_and_braced_types() {
    let bare = doc(" @constructor @extends tls.Server ");
    let braced = doc(" @constructor @extends {tls.Server} ");
    for d in [bare, braced] {
        assert!(d.has(&Tag::Constructor));
        let ext = d.find(&Tag::Extends).unwrap();
        assert_eq!(ext.ty.as_ref().unwrap().expr, TypeExpr::named("tls.Server"));
    }
}

#[test]
fn multi_line_typedef() {
    let d = doc("\n * @typedef {{\n *   host: ?string,\n *   port: ?number\n * }}\n ");
    let ty = &d.find(&Tag::Typedef).unwrap().ty.as_ref().unwrap().expr;
    assert!(ty.record_field("host").is_some());
    assert!(ty.record_field("port").is_some());
}

#[test]
fn unknown_tags_are_kept() {
    let d = doc(" @nosideeffects @suppress {checkTypes} ");
    assert!(d.has(&Tag::NoSideEffects));
    let unknown: Vec<_> = d.unknown_tags().collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].tag, Tag::Unknown("suppress".into()));
}

#[test]
fn bad_param_type_is_malformed() {
    let err = DocComment::parse(" @param {function(} x ", Span::new(0, 24, 9, 1)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));
    assert_eq!(err.context.unwrap().line, Some(9));
}
