//! Exporting a catalog into host symbol tables

use std::collections::HashMap;

use ambient_catalog::{Declaration, HostSymbolTable};
use ambient_foundation::{Error, ErrorKind, Result};

use crate::fixtures::node_catalog;

#[test]
fn export_top_level_into_hash_map() {
    let catalog = node_catalog();
    let mut table: HashMap<String, Declaration> = HashMap::new();
    let report = catalog.export_into(&mut table, false);
    assert!(report.is_clean());
    assert_eq!(report.exported, catalog.len());
    assert!(table.contains_key("https.ConnectOptions"));
    assert!(!table.contains_key("https.Server.prototype.listen"));
}

#[test]
fn export_members_into_ord_map() {
    let catalog = node_catalog();
    let mut table: im::OrdMap<String, Declaration> = im::OrdMap::new();
    let report = catalog.export_into(&mut table, true);
    assert!(report.is_clean());
    assert_eq!(report.exported, catalog.all_declarations().len());
    assert!(table.contains_key("tls.Server.prototype.addContext"));
}

#[test]
fn host_collisions_are_reported_not_fatal() {
    let catalog = node_catalog();
    let mut table: HashMap<String, Declaration> = HashMap::new();
    let https = catalog.resolve("https").unwrap().clone();
    table.insert("https".into(), https);

    let report = catalog.export_into(&mut table, false);
    assert!(!report.is_clean());
    assert_eq!(report.exported, catalog.len() - 1);
    let collided: Vec<String> = report.collisions().map(|n| n.full_name()).collect();
    assert_eq!(collided, ["https"]);
    assert!(matches!(
        &report.rejected[0].1.kind,
        ErrorKind::DuplicateName { namespace, .. } if namespace == "<global>"
    ));
}

/// A host that only accepts one namespace.
struct OnlyNamespace<'a> {
    prefix: &'a str,
    accepted: Vec<String>,
}

impl HostSymbolTable for OnlyNamespace<'_> {
    fn declare_ambient(&mut self, declaration: &Declaration) -> Result<()> {
        let name = declaration.name.full_name();
        if name == self.prefix || name.starts_with(&format!("{}.", self.prefix)) {
            self.accepted.push(name);
            Ok(())
        } else {
            Err(Error::not_found(name))
        }
    }
}

#[test]
fn custom_host_through_trait_object() {
    let catalog = node_catalog();
    let mut host = OnlyNamespace {
        prefix: "tls",
        accepted: Vec::new(),
    };
    let report = catalog.export_into(&mut host as &mut dyn HostSymbolTable, false);
    assert_eq!(host.accepted, ["tls", "tls.CreateOptions", "tls.createServer", "tls.Server", "tls.CleartextStream"]);
    assert_eq!(report.collisions().count(), 0);
    assert_eq!(report.rejected.len(), catalog.len() - 5);
}
