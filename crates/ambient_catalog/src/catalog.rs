//! The immutable declaration catalog.
//!
//! A [`Catalog`] is produced once by a [`CatalogBuilder`](crate::CatalogBuilder)
//! and only read afterwards. Top-level declarations are keyed by their full
//! dotted name; class members live inside their class.

use std::collections::HashSet;

use ambient_foundation::{Error, QualifiedName, Result, TypeExpr};
use ambient_language::FileHeader;

use crate::declaration::{ClassDeclaration, Declaration, DeclarationKind, SuperStatus};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names the host environment always provides.
const BUILTIN_NAMES: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "Boolean",
    "Date",
    "Error",
    "Function",
    "Iterable",
    "Iterator",
    "Map",
    "Number",
    "Object",
    "Promise",
    "RegExp",
    "Set",
    "String",
    "Symbol",
    "Uint8Array",
];

/// Metadata about one loaded declaration source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceInfo {
    /// Source name, usually a file name.
    pub name: String,
    /// `@fileoverview` text.
    pub overview: Option<String>,
    /// Marked `@externs`.
    pub externs: bool,
    /// `@see` links from the file header.
    pub see: Vec<String>,
    /// Number of statements lowered from this source.
    pub statements: usize,
}

impl SourceInfo {
    pub(crate) fn new(name: &str, header: Option<&FileHeader>, statements: usize) -> Self {
        Self {
            name: name.to_string(),
            overview: header.and_then(|h| h.overview.clone()),
            externs: header.is_some_and(|h| h.externs),
            see: header.map(|h| h.see.clone()).unwrap_or_default(),
            statements,
        }
    }
}

/// A member found on a class or one of its ancestors.
#[derive(Clone, Copy, Debug)]
pub struct MemberRef<'a> {
    /// The class that declares the member.
    pub owner: &'a Declaration,
    /// The member itself.
    pub member: &'a Declaration,
    /// True for prototype members.
    pub instance: bool,
}

/// A name that is referenced but not declared in the catalog.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnresolvedReference {
    /// The referenced name.
    pub name: String,
    /// The declaration containing the reference.
    pub referenced_from: QualifiedName,
}

/// An immutable table of ambient declarations.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Catalog {
    /// Top-level declarations by full dotted name.
    pub(crate) declarations: im::OrdMap<String, Declaration>,
    /// Top-level names in load order.
    pub(crate) order: im::Vector<QualifiedName>,
    /// Module bindings from include blocks, by local name.
    pub(crate) modules: im::OrdMap<String, String>,
    /// Loaded sources in load order.
    pub(crate) sources: im::Vector<SourceInfo>,
}

impl Catalog {
    /// Loads a catalog from a single source with default options.
    ///
    /// # Errors
    /// Returns the first load error; no partial catalog is produced.
    pub fn load(name: &str, source: &str) -> Result<Self> {
        crate::CatalogBuilder::new().source(name, source).build()
    }

    /// Returns the number of top-level declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Returns the top-level declarations in load order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.order
            .iter()
            .filter_map(|name| self.declarations.get(&name.full_name()))
    }

    /// Returns every declaration, members included, in load order.
    #[must_use]
    pub fn all_declarations(&self) -> Vec<&Declaration> {
        let mut all = Vec::new();
        for decl in self.declarations() {
            all.push(decl);
            if let Some(class) = decl.as_class() {
                all.extend(class.static_members.iter());
                all.extend(class.instance_members.iter());
            }
        }
        all
    }

    /// Returns top-level names starting with `prefix`, sorted.
    pub fn names_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.declarations
            .range(prefix.to_string()..)
            .map(|(name, _)| name.as_str())
            .take_while(move |name| name.starts_with(prefix))
    }

    /// Returns the loaded sources.
    pub fn sources(&self) -> impl Iterator<Item = &SourceInfo> {
        self.sources.iter()
    }

    /// Returns the module a local name was bound to by an include block.
    #[must_use]
    pub fn module_binding(&self, binding: &str) -> Option<&str> {
        self.modules.get(binding).map(String::as_str)
    }

    /// Returns all module bindings, sorted by local name.
    pub fn module_bindings(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Looks up a top-level declaration by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    /// Resolves a fully-qualified dotted name.
    ///
    /// - Top-level names are looked up directly.
    /// - `C.prototype.m` finds instance member `m` of class `C` or an ancestor.
    /// - `C.m` finds static member `m` of `C`, then instance member `m` of
    ///   `C` or an ancestor.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Declaration> {
        self.resolve_name(&QualifiedName::parse(name))
    }

    /// Like [`Catalog::resolve`], for an already-split name.
    #[must_use]
    pub fn resolve_name(&self, name: &QualifiedName) -> Option<&Declaration> {
        if let Some(decl) = self.declarations.get(&name.full_name()) {
            return Some(decl);
        }
        if let Some((owner, member)) = name.split_prototype_member() {
            return self
                .lookup_instance_member(&owner.full_name(), member)
                .map(|m| m.member);
        }
        let owner = name.parent()?;
        self.resolve_member(&owner.full_name(), name.simple_name())
            .map(|m| m.member)
    }

    /// Finds a member of a class, reporting which class declared it.
    ///
    /// Static members of the class itself come first, then instance members
    /// of the class and its ancestors.
    #[must_use]
    pub fn resolve_member(&self, class: &str, member: &str) -> Option<MemberRef<'_>> {
        let owner = self.declarations.get(class)?;
        if let Some(found) = owner.as_class()?.static_member(member) {
            return Some(MemberRef {
                owner,
                member: found,
                instance: false,
            });
        }
        self.lookup_instance_member(class, member)
    }

    /// Finds an instance member on a class or its ancestors.
    #[must_use]
    pub fn lookup_instance_member(&self, class: &str, member: &str) -> Option<MemberRef<'_>> {
        self.ancestry(class).find_map(|(owner, decl)| {
            decl.instance_member(member).map(|found| MemberRef {
                owner,
                member: found,
                instance: true,
            })
        })
    }

    /// Walks a class and its supertypes, nearest first.
    ///
    /// Stops at a class without `extends`, at an external supertype, or at a
    /// class already visited.
    pub fn ancestry<'a>(
        &'a self,
        class: &str,
    ) -> impl Iterator<Item = (&'a Declaration, &'a ClassDeclaration)> + 'a {
        let mut next = self.class_entry(class);
        let mut visited = HashSet::new();
        std::iter::from_fn(move || {
            let (decl, class) = next?;
            if !visited.insert(decl.name.full_name()) {
                return None;
            }
            next = class
                .extends
                .as_ref()
                .filter(|sup| sup.status != SuperStatus::External)
                .and_then(|sup| self.class_entry(&sup.name));
            Some((decl, class))
        })
    }

    fn class_entry(&self, name: &str) -> Option<(&Declaration, &ClassDeclaration)> {
        let decl = self.declarations.get(name)?;
        decl.as_class().map(|class| (decl, class))
    }

    /// Lists the members visible on a class: its own first, then inherited
    /// ones not shadowed by a nearer class.
    ///
    /// Returns `None` if `class` is not a class.
    #[must_use]
    pub fn members(&self, class: &str) -> Option<Vec<MemberRef<'_>>> {
        let (owner, decl) = self.class_entry(class)?;
        let mut seen = HashSet::new();
        let mut members: Vec<MemberRef<'_>> = decl
            .static_members
            .iter()
            .map(|member| MemberRef {
                owner,
                member,
                instance: false,
            })
            .collect();

        for (ancestor, ancestor_class) in self.ancestry(class) {
            for member in &ancestor_class.instance_members {
                if seen.insert(member.name.simple_name().to_string()) {
                    members.push(MemberRef {
                        owner: ancestor,
                        member,
                        instance: true,
                    });
                }
            }
        }
        Some(members)
    }

    /// Substitutes typedef names at the top of `ty` until a non-alias form
    /// is reached.
    ///
    /// Only a top-level `Named` reference is substituted; names nested in
    /// unions, records, or functions stay lazy.
    ///
    /// # Errors
    /// Returns `CyclicTypedef` if an alias is revisited.
    pub fn expand(&self, ty: &TypeExpr) -> Result<TypeExpr> {
        self.expand_from(ty, Vec::new())
    }

    /// Expands `ty`, treating the aliases in `chain` as already visited.
    pub(crate) fn expand_from(&self, ty: &TypeExpr, mut chain: Vec<String>) -> Result<TypeExpr> {
        self.expand_chain(ty, &mut chain)
    }

    /// Expands `ty`, recording each alias visited in `chain`.
    pub(crate) fn expand_chain(&self, ty: &TypeExpr, chain: &mut Vec<String>) -> Result<TypeExpr> {
        let mut current = ty.clone();
        while let TypeExpr::Named(name) = &current {
            let Some(DeclarationKind::Typedef(aliased)) = self.resolve(name).map(|d| &d.kind) else {
                break;
            };
            if chain.iter().any(|seen| seen == name) {
                chain.push(name.clone());
                return Err(Error::cyclic_typedef(std::mem::take(chain)));
            }
            chain.push(name.clone());
            current = aliased.clone();
        }
        Ok(current)
    }

    /// Lists names referenced by declarations that the catalog does not
    /// declare, including external supertypes.
    ///
    /// Type parameters and builtin names are not reported.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut found = Vec::new();
        for decl in self.all_declarations() {
            let template = self.template_scope(decl);
            let mut check = |name: &str| {
                if !template.iter().any(|t| t == name)
                    && !BUILTIN_NAMES.contains(&name)
                    && self.resolve(name).is_none()
                {
                    found.push(UnresolvedReference {
                        name: name.to_string(),
                        referenced_from: decl.name.clone(),
                    });
                }
            };

            match &decl.kind {
                DeclarationKind::Class(class) => {
                    if let Some(sup) = &class.extends {
                        check(sup.name.as_str());
                    }
                    for name in &class.implements {
                        check(name.as_str());
                    }
                    for param in &class.constructor.params {
                        param.ty.visit_names(&mut check);
                    }
                }
                DeclarationKind::Function(sig) => {
                    for param in &sig.params {
                        param.ty.visit_names(&mut check);
                    }
                    sig.return_type.visit_names(&mut check);
                    if let Some(this) = &sig.this_type {
                        this.visit_names(&mut check);
                    }
                }
                DeclarationKind::Typedef(ty) => ty.visit_names(&mut check),
                DeclarationKind::Variable(var) => var.ty.visit_names(&mut check),
            }
        }
        found.sort();
        found.dedup();
        found
    }

    /// Type parameter names in scope for a declaration.
    fn template_scope(&self, decl: &Declaration) -> Vec<String> {
        let mut names = match &decl.kind {
            DeclarationKind::Class(class) => class.template.clone(),
            DeclarationKind::Function(sig) => sig.template.clone(),
            _ => Vec::new(),
        };
        let owner = decl
            .name
            .split_prototype_member()
            .map(|(owner, _)| owner)
            .or_else(|| decl.name.parent());
        if let Some(class) = owner.and_then(|o| self.class_entry(&o.full_name())) {
            names.extend(class.1.template.iter().cloned());
        }
        names
    }
}
