//! Name resolution across files and inheritance chains

use crate::fixtures::node_catalog;

#[test]
fn top_level_names() {
    let catalog = node_catalog();
    assert_eq!(catalog.resolve("https").unwrap().kind_name(), "namespace");
    assert_eq!(catalog.resolve("https.Server").unwrap().kind_name(), "class");
    assert_eq!(catalog.resolve("https.ConnectOptions").unwrap().kind_name(), "typedef");
    assert_eq!(catalog.resolve("https.request").unwrap().kind_name(), "function");
    assert_eq!(catalog.resolve("https.globalAgent").unwrap().kind_name(), "variable");
    assert!(catalog.resolve("https.nope").is_none());
    assert!(catalog.resolve("net.Server").is_none());
}

#[test]
fn own_instance_members() {
    let catalog = node_catalog();
    let listen = catalog.resolve("https.Server.listen").unwrap();
    assert_eq!(listen.name.full_name(), "https.Server.prototype.listen");
    assert!(listen.as_function().unwrap().is_variadic());
    assert_eq!(catalog.resolve("https.Server.prototype.listen"), Some(listen));
}

#[test]
fn inherited_members_across_files() {
    let catalog = node_catalog();
    let add_context = catalog.resolve("https.Server.addContext").unwrap();
    assert_eq!(add_context.name.full_name(), "tls.Server.prototype.addContext");
    assert_eq!(add_context.source, "tls.js");

    let found = catalog.resolve_member("https.Server", "maxConnections").unwrap();
    assert_eq!(found.owner.name.full_name(), "tls.Server");
    assert!(found.instance);

    let agent = catalog.resolve("https.Agent.prototype.maxSockets").unwrap();
    assert_eq!(agent.name.full_name(), "http.Agent.prototype.maxSockets");
}

#[test]
fn members_do_not_flow_down_to_ancestors() {
    let catalog = node_catalog();
    assert!(catalog.resolve("tls.Server.listen").is_none());
    assert!(catalog.resolve("http.Agent.prototype.nope").is_none());
}

#[test]
fn walk_stops_at_external_supertype() {
    let catalog = node_catalog();
    let chain: Vec<String> = catalog
        .ancestry("https.Server")
        .map(|(decl, _)| decl.name.full_name())
        .collect();
    assert_eq!(chain, ["https.Server", "tls.Server"]);
    assert!(catalog.resolve("https.Server.prototype.connect").is_none());
}

#[test]
fn members_list_own_then_inherited() {
    let catalog = node_catalog();
    let names: Vec<String> = catalog
        .members("https.Server")
        .unwrap()
        .iter()
        .map(|m| m.member.name.full_name())
        .collect();
    assert_eq!(
        names,
        [
            "https.Server.prototype.listen",
            "https.Server.prototype.close",
            "tls.Server.prototype.addContext",
            "tls.Server.prototype.maxConnections",
        ]
    );
    assert!(catalog.members("https.request").is_none());
}

#[test]
fn prefix_listing_is_sorted() {
    let catalog = node_catalog();
    let names: Vec<&str> = catalog.names_with_prefix("https.g").collect();
    assert_eq!(names, ["https.get", "https.globalAgent"]);
}
