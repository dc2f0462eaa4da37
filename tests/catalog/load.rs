//! Loading sources into a catalog

use ambient_catalog::{Catalog, CatalogBuilder, LoadOptions};
use ambient_foundation::ErrorKind;

use crate::fixtures::{HTTPS, TLS, node_catalog};

#[test]
fn https_fixture_alone() {
    let catalog = Catalog::load("https.js", HTTPS).unwrap();
    let names: Vec<String> = catalog
        .declarations()
        .map(|d| d.name.full_name())
        .collect();
    assert_eq!(
        names,
        [
            "https",
            "https.Server",
            "https.createServer",
            "https.ConnectOptions",
            "https.request",
            "https.get",
            "https.Agent",
            "https.globalAgent",
        ]
    );

    let server = catalog.get("https.Server").unwrap().as_class().unwrap();
    assert_eq!(server.instance_members.len(), 2);
    assert!(server.extends.as_ref().unwrap().is_external());
}

#[test]
fn sources_record_headers_and_bindings() {
    let catalog = node_catalog();
    let sources: Vec<_> = catalog.sources().collect();
    assert_eq!(sources.len(), 3);
    assert_eq!(sources[2].name, "https.js");
    assert_eq!(sources[2].statements, 10);
    assert!(sources[2].externs);
    assert!(
        sources[0]
            .overview
            .as_deref()
            .unwrap()
            .contains("tls module")
    );

    assert_eq!(catalog.module_binding("https"), Some("https"));
    assert_eq!(catalog.module_binding("tls"), Some("tls"));
    assert_eq!(catalog.module_binding("net"), None);
    assert_eq!(catalog.module_bindings().count(), 3);
}

#[test]
fn cross_file_supertype_is_resolved() {
    let catalog = node_catalog();
    let server = catalog.get("https.Server").unwrap().as_class().unwrap();
    assert!(!server.extends.as_ref().unwrap().is_external());

    let tls_server = catalog.get("tls.Server").unwrap().as_class().unwrap();
    assert!(tls_server.extends.as_ref().unwrap().is_external());
}

#[test]
fn load_order_does_not_matter_for_supertypes() {
    let catalog = CatalogBuilder::new()
        .source("https.js", HTTPS)
        .source("tls.js", TLS)
        .build()
        .unwrap();
    assert!(catalog.resolve("https.Server.addContext").is_some());
}

#[test]
fn unresolved_references_are_external_names() {
    let catalog = node_catalog();
    let names: Vec<String> = catalog
        .unresolved_references()
        .into_iter()
        .map(|r| r.name)
        .collect();
    for external in ["buffer.Buffer", "net.Server", "stream.Writable", "events.EventEmitter"] {
        assert!(names.iter().any(|n| n == external), "missing {external}");
    }
    for declared in ["tls.Server", "http.IncomingMessage", "https.Agent"] {
        assert!(!names.iter().any(|n| n == declared), "{declared} reported");
    }
}

#[test]
fn load_error_names_the_source() {
    let err = CatalogBuilder::new()
        .source("tls.js", TLS)
        .source("broken.js", "var broken = {};\n/** @type {Array.<} */\nbroken.value;")
        .build()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.source.as_deref(), Some("broken.js"));
    assert_eq!(ctx.line, Some(2));
}

#[test]
fn prototype_member_of_non_class_is_malformed() {
    let source = "var a = {};\n/** @type {number} */\na.b.prototype.c;";
    let err = Catalog::load("a.js", source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));
}

#[test]
fn stray_param_respects_strictness() {
    let source = "var a = {};\n/** @param {string} nope */\na.f = function(x) {};";
    let err = Catalog::load("a.js", source).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));

    let lenient = CatalogBuilder::new()
        .options(LoadOptions::new().strict_params(false))
        .source("a.js", source)
        .build();
    assert!(lenient.is_ok());
}

#[test]
fn unknown_tags_can_be_rejected() {
    let source = "var a = {};\n/** @suppress {checkTypes} @type {number} */\na.b;";
    assert!(Catalog::load("a.js", source).is_ok());

    let err = CatalogBuilder::new()
        .options(LoadOptions::new().allow_unknown_tags(false))
        .source("a.js", source)
        .build()
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedDeclaration(_)));
}

#[test]
fn namespace_augmentation_across_files() {
    let catalog = CatalogBuilder::new()
        .source("a.js", "var net = {};\n/** @type {number} */\nnet.a;")
        .source("b.js", "var net = {};\n/** @type {string} */\nnet.b;")
        .build()
        .unwrap();
    assert!(catalog.resolve("net").unwrap().is_namespace());
    assert!(catalog.resolve("net.a").is_some());
    assert!(catalog.resolve("net.b").is_some());
}

#[test]
fn members_may_come_from_an_earlier_source_than_their_class() {
    let members = "b.Server.prototype.port = function() {};\n\
                   /** @return {!b.Server} */\nb.Server.create = function() {};";
    let class = "var b = {};\n/** @constructor */\nb.Server = function() {};";

    let orders = [(("a.js", members), ("b.js", class)), (("b.js", class), ("a.js", members))];
    for (first, second) in orders {
        let catalog = CatalogBuilder::new()
            .source(first.0, first.1)
            .source(second.0, second.1)
            .build()
            .unwrap();
        assert_eq!(catalog.len(), 2);
        let port = catalog.resolve_member("b.Server", "port").unwrap();
        assert_eq!(port.owner.name.full_name(), "b.Server");
        assert!(port.instance);
        assert_eq!(catalog.resolve("b.Server.create").unwrap().kind_name(), "function");
    }
}

#[test]
fn tls_members_load_before_the_tls_class_file() {
    let first_member = TLS.find("tls.Server.prototype").unwrap();
    let split = TLS[..first_member].rfind("/**").unwrap();
    let (head, tail) = TLS.split_at(split);
    let catalog = CatalogBuilder::new()
        .source("members.js", tail)
        .source("tls.js", head)
        .build()
        .unwrap();
    assert!(catalog.resolve("tls.Server.prototype.addContext").is_some());
}

#[test]
fn static_member_and_nested_declaration_share_a_namespace() {
    let class = "/** @constructor */ A = function() {};";
    let nested = "/** @constructor */ A.B = function() {};";
    let member = "/** @return {string} */ A.B = function(x) {};";

    for sources in [[class, nested, member], [class, member, nested]] {
        let mut builder = CatalogBuilder::new();
        for (index, text) in sources.iter().enumerate() {
            builder.add_source(format!("{index}.js"), *text);
        }
        let err = builder.build().unwrap_err();
        assert!(
            matches!(&err.kind, ErrorKind::DuplicateName { name, namespace } if name == "B" && namespace == "A"),
            "got {err:?}"
        );
    }
}
