//! Text rendering of declarations for the CLI and REPL.

use std::fmt::Write;

use ambient_catalog::{
    Catalog, Declaration, DeclarationKind, FunctionSignature, MemberRef, UnresolvedReference,
};

/// Renders one declaration as a single line.
#[must_use]
pub fn describe(decl: &Declaration) -> String {
    let name = decl.name.full_name();
    let mut out = match &decl.kind {
        DeclarationKind::Class(class) => {
            let mut line = format!("{} {name}", decl.kind_name());
            if !class.template.is_empty() {
                let _ = write!(line, "<{}>", class.template.join(", "));
            }
            line.push_str(&signature_params(&class.constructor));
            if let Some(sup) = &class.extends {
                let _ = write!(line, " extends {}", sup.name);
                if sup.is_external() {
                    line.push_str(" (external)");
                }
            }
            if !class.implements.is_empty() {
                let _ = write!(line, " implements {}", class.implements.join(", "));
            }
            line
        }
        DeclarationKind::Function(sig) => format!("function {name}{}", signature(sig)),
        DeclarationKind::Typedef(ty) => format!("typedef {name} = {ty}"),
        DeclarationKind::Variable(var) if var.namespace => format!("namespace {name}"),
        DeclarationKind::Variable(var) if var.is_enum() => {
            format!("enum {name}: {} {{ {} }}", var.ty, var.enum_members.join(", "))
        }
        DeclarationKind::Variable(var) => {
            let keyword = if var.constant { "const" } else { "var" };
            format!("{keyword} {name}: {}", var.ty)
        }
    };
    if decl.doc.deprecated.is_some() {
        out.push_str(" (deprecated)");
    }
    out
}

fn signature_params(sig: &FunctionSignature) -> String {
    let params: Vec<String> = sig
        .params
        .iter()
        .map(|p| {
            let dots = if p.variadic { "..." } else { "" };
            let eq = if p.optional { "=" } else { "" };
            format!("{dots}{}: {}{eq}", p.name, p.ty)
        })
        .collect();
    format!("({})", params.join(", "))
}

/// Renders a signature as `(name: T, ...): R`.
#[must_use]
pub fn signature(sig: &FunctionSignature) -> String {
    let mut out = String::new();
    if !sig.template.is_empty() {
        let _ = write!(out, "<{}>", sig.template.join(", "));
    }
    out.push_str(&signature_params(sig));
    if !sig.return_type.is_any() {
        let _ = write!(out, ": {}", sig.return_type);
    }
    out
}

/// Renders a member with where it was found.
#[must_use]
pub fn describe_member(class: &str, member: &MemberRef<'_>) -> String {
    let mut line = String::new();
    if !member.instance {
        line.push_str("static ");
    }
    line.push_str(&describe(member.member));
    let owner = member.owner.name.full_name();
    if owner != class {
        let _ = write!(line, "  [from {owner}]");
    }
    line
}

/// Renders every declaration, members indented under their class.
#[must_use]
pub fn dump(catalog: &Catalog) -> String {
    let mut out = String::new();
    for decl in catalog.declarations() {
        out.push_str(&describe(decl));
        out.push('\n');
        if let Some(class) = decl.as_class() {
            for member in &class.static_members {
                let _ = writeln!(out, "  static {}", describe(member));
            }
            for member in &class.instance_members {
                let _ = writeln!(out, "  {}", describe(member));
            }
        }
    }
    out
}

/// Renders an unresolved reference report.
#[must_use]
pub fn unresolved(refs: &[UnresolvedReference]) -> String {
    refs.iter().fold(String::new(), |mut out, r| {
        let _ = writeln!(out, "{}  (from {})", r.name, r.referenced_from);
        out
    })
}
