//! Catalog construction.
//!
//! [`CatalogBuilder`] parses one or more named sources and lowers their
//! stub statements into declarations. All sources share one namespace, so
//! a class in `https.js` may extend one declared in `tls.js`. Any load error
//! aborts the whole build.

use std::collections::HashSet;

use ambient_foundation::{
    Error, ErrorContext, ErrorKind, Primitive, QualifiedName, Result, TypeExpr,
};
use ambient_language::{
    DocComment, DocTag, Expr, Literal, ParamType, SourceFile, Statement, StatementKind, Tag,
    check_variadic_last, parse,
};
use tracing::{debug, trace, warn};

use crate::catalog::{Catalog, SourceInfo};
use crate::declaration::{
    ClassDeclaration, Declaration, DeclarationKind, DocInfo, FunctionSignature, Parameter,
    SuperRef, SuperStatus, VariableDeclaration,
};

/// Namespace label used in errors for top-level names.
const GLOBAL_NAMESPACE: &str = "<global>";

/// Options controlling how strictly sources are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Reject `@param` tags naming no parameter of the stub.
    pub strict_params: bool,
    /// Accept doc tags the parser does not recognize.
    pub allow_unknown_tags: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            strict_params: true,
            allow_unknown_tags: true,
        }
    }
}

impl LoadOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether stray `@param` names are rejected.
    #[must_use]
    pub const fn strict_params(mut self, strict: bool) -> Self {
        self.strict_params = strict;
        self
    }

    /// Sets whether unknown doc tags are accepted.
    #[must_use]
    pub const fn allow_unknown_tags(mut self, allow: bool) -> Self {
        self.allow_unknown_tags = allow;
        self
    }
}

/// Collects named sources and builds a [`Catalog`] from them.
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    options: LoadOptions,
    sources: Vec<(String, String)>,
}

impl CatalogBuilder {
    /// Creates an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load options.
    #[must_use]
    pub const fn options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a named source.
    #[must_use]
    pub fn source(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.add_source(name, text);
        self
    }

    /// Adds a named source in place.
    pub fn add_source(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.sources.push((name.into(), text.into()));
    }

    /// Returns the number of sources added.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Parses and lowers every source.
    ///
    /// # Errors
    /// Returns `ParseError` or `MalformedDeclaration` for syntax the
    /// recognizer rejects, and `DuplicateName` for colliding declarations.
    /// The error context names the source and position.
    pub fn build(&self) -> Result<Catalog> {
        let mut parsed = Vec::with_capacity(self.sources.len());
        for (name, text) in &self.sources {
            let file = parse(text).map_err(|e| e.in_source(name))?;
            debug!(
                source = %name,
                statements = file.statements.len(),
                includes = file.includes.len(),
                "parsed declaration source"
            );
            parsed.push((name.as_str(), file));
        }

        // Classes of every source before any member or nested declaration.
        let mut lowering = Lowering::new(self.options, &parsed);
        for (index, (name, file)) in parsed.iter().enumerate() {
            lowering
                .lower_classes(index, name, file)
                .map_err(|e| e.in_source(*name))?;
        }
        for (index, (name, file)) in parsed.iter().enumerate() {
            lowering
                .lower_rest(index, name, file)
                .map_err(|e| e.in_source(*name))?;
        }
        lowering.finish()
    }
}

/// Where a statement sits, for ordering declarations by source position.
type Position = (usize, usize);

/// State carried while lowering statements.
struct Lowering {
    options: LoadOptions,
    /// Names declared `@constructor`, `@interface`, or `@record` anywhere.
    class_names: HashSet<String>,
    catalog: Catalog,
    /// Top-level names with the position that first declared them.
    positions: Vec<(Position, QualifiedName)>,
}

impl Lowering {
    fn new(options: LoadOptions, parsed: &[(&str, SourceFile)]) -> Self {
        let class_names = parsed
            .iter()
            .flat_map(|(_, file)| file.statements.iter())
            .filter(|stmt| is_class_statement(stmt))
            .map(|stmt| stmt.target().full_name())
            .collect();

        Self {
            options,
            class_names,
            catalog: Catalog::default(),
            positions: Vec::new(),
        }
    }

    fn lower_classes(&mut self, index: usize, name: &str, file: &SourceFile) -> Result<()> {
        for include in &file.includes {
            self.bind_module(&include.binding, &include.module)
                .map_err(|e| e.with_context(include.span.context()))?;
        }

        let classes = file
            .statements
            .iter()
            .enumerate()
            .filter(|(_, stmt)| is_class_statement(stmt));
        for (stmt_index, stmt) in classes {
            self.lower_statement(name, (index, stmt_index), stmt)
                .map_err(|e| attach_position(e, stmt))?;
        }
        Ok(())
    }

    fn lower_rest(&mut self, index: usize, name: &str, file: &SourceFile) -> Result<()> {
        let rest = file
            .statements
            .iter()
            .enumerate()
            .filter(|(_, stmt)| !is_class_statement(stmt));
        for (stmt_index, stmt) in rest {
            self.lower_statement(name, (index, stmt_index), stmt)
                .map_err(|e| attach_position(e, stmt))?;
        }

        self.catalog.sources.push_back(SourceInfo::new(
            name,
            file.header.as_ref(),
            file.statements.len(),
        ));
        debug!(source = %name, declarations = self.catalog.len(), "loaded declaration source");
        Ok(())
    }

    fn bind_module(&mut self, binding: &str, module: &str) -> Result<()> {
        match self.catalog.modules.get(binding) {
            Some(existing) if existing != module => Err(Error::duplicate_name(
                binding,
                "module bindings",
            )),
            Some(_) => Ok(()),
            None => {
                trace!(binding, module, "module binding");
                self.catalog
                    .modules
                    .insert(binding.to_string(), module.to_string());
                Ok(())
            }
        }
    }

    fn lower_statement(&mut self, source: &str, position: Position, stmt: &Statement) -> Result<()> {
        let empty = DocComment::default();
        let doc = stmt.doc.as_ref().unwrap_or(&empty);
        self.check_tags(doc)?;

        let target = stmt.target();
        let base = Declaration {
            name: target.clone(),
            kind: DeclarationKind::Variable(VariableDeclaration::typed(TypeExpr::Any)),
            doc: doc_info(doc),
            span: stmt.span,
            source: source.to_string(),
        };

        if target.mentions_prototype() {
            let Some((owner, member)) = target.split_prototype_member() else {
                return Err(Error::malformed(format!(
                    "{target} is not of the form Class.prototype.member"
                )));
            };
            let owner = owner.full_name();
            if !self.class_names.contains(&owner) {
                return Err(Error::malformed(format!(
                    "prototype member {member} declared on {owner}, which is not a class"
                )));
            }
            let kind = lower_member(stmt, doc, self.options)?;
            return self.add_member(&owner, true, Declaration { kind, ..base });
        }

        if is_class_doc(doc) {
            let kind = DeclarationKind::Class(lower_class(stmt, doc, self.options)?);
            return self.add_top_level(position, Declaration { kind, ..base });
        }

        if doc.has(&Tag::Typedef) {
            let kind = DeclarationKind::Typedef(lower_typedef(stmt, doc)?);
            return self.add_top_level(position, Declaration { kind, ..base });
        }

        let static_owner = target
            .parent()
            .map(|p| p.full_name())
            .filter(|p| self.class_names.contains(p));
        if let Some(owner) = static_owner {
            let kind = lower_member(stmt, doc, self.options)?;
            return self.add_member(&owner, false, Declaration { kind, ..base });
        }

        let kind = lower_member(stmt, doc, self.options)?;
        self.add_top_level(position, Declaration { kind, ..base })
    }

    fn check_tags(&self, doc: &DocComment) -> Result<()> {
        if let Some(tag) = doc.unknown_tags().next() {
            if !self.options.allow_unknown_tags {
                return Err(Error::malformed(format!("unknown doc tag {}", tag.tag))
                    .with_context(tag.span.context()));
            }
            trace!(tag = %tag.tag, "skipping unknown doc tag");
        }
        Ok(())
    }

    fn add_top_level(&mut self, position: Position, decl: Declaration) -> Result<()> {
        let key = decl.name.full_name();
        if let Some(existing) = self.catalog.declarations.get(&key) {
            if existing.is_namespace() && decl.is_namespace() {
                trace!(name = %key, "namespace re-declared");
                return Ok(());
            }
            let namespace = decl
                .name
                .parent()
                .map_or_else(|| GLOBAL_NAMESPACE.to_string(), |p| p.full_name());
            return Err(Error::duplicate_name(decl.name.simple_name(), namespace));
        }
        if let Some(parent) = decl.name.parent() {
            let simple = decl.name.simple_name();
            let shadows_static = self
                .catalog
                .get(&parent.full_name())
                .and_then(Declaration::as_class)
                .is_some_and(|class| {
                    class
                        .static_members
                        .iter()
                        .any(|m| m.name.simple_name() == simple)
                });
            if shadows_static {
                return Err(Error::duplicate_name(simple, parent.full_name()));
            }
        }

        debug!(name = %key, kind = decl.kind_name(), "registered declaration");
        self.positions.push((position, decl.name.clone()));
        self.catalog.declarations.insert(key, decl);
        Ok(())
    }

    fn add_member(&mut self, owner: &str, instance: bool, decl: Declaration) -> Result<()> {
        // Statics and nested declarations share the class namespace.
        if !instance && self.catalog.declarations.contains_key(&decl.name.full_name()) {
            return Err(Error::duplicate_name(decl.name.simple_name(), owner));
        }

        let Some(DeclarationKind::Class(class)) =
            self.catalog.declarations.get_mut(owner).map(|d| &mut d.kind)
        else {
            return Err(Error::new(ErrorKind::Internal(format!(
                "class {owner} was not registered before its members"
            ))));
        };

        let (members, namespace) = if instance {
            (&mut class.instance_members, format!("{owner}.prototype"))
        } else {
            (&mut class.static_members, owner.to_string())
        };
        let simple = decl.name.simple_name();
        if members.iter().any(|m| m.name.simple_name() == simple) {
            return Err(Error::duplicate_name(simple, namespace));
        }

        debug!(name = %decl.name, kind = decl.kind_name(), "registered member");
        members.push(decl);
        Ok(())
    }

    fn finish(mut self) -> Result<Catalog> {
        self.positions.sort_by_key(|(pos, _)| *pos);
        self.catalog.order = self.positions.into_iter().map(|(_, name)| name).collect();

        let class_names: Vec<String> = self
            .catalog
            .declarations
            .iter()
            .filter(|(_, d)| d.as_class().is_some())
            .map(|(name, _)| name.clone())
            .collect();

        for name in class_names {
            let Some((target, source)) = self.catalog.get(&name).and_then(|d| {
                let sup = d.as_class()?.extends.as_ref()?;
                Some((sup.name.clone(), d.source.clone()))
            }) else {
                continue;
            };

            let status = match self.catalog.get(&target) {
                Some(decl) if decl.as_class().is_some() => SuperStatus::Resolved,
                Some(decl) => {
                    return Err(Error::malformed(format!(
                        "{name} extends {target}, which is a {}",
                        decl.kind_name()
                    ))
                    .with_context(
                        ErrorContext::new()
                            .with_source(source)
                            .with_declaration(name.clone()),
                    ));
                }
                None => {
                    warn!(class = %name, supertype = %target, "supertype is not in the catalog");
                    SuperStatus::External
                }
            };

            if let Some(DeclarationKind::Class(class)) =
                self.catalog.declarations.get_mut(&name).map(|d| &mut d.kind)
            {
                if let Some(sup) = class.extends.as_mut() {
                    sup.status = status;
                }
            }
        }

        debug!(
            declarations = self.catalog.len(),
            sources = self.catalog.sources.len(),
            "catalog built"
        );
        Ok(self.catalog)
    }
}

fn attach_position(err: Error, stmt: &Statement) -> Error {
    if err.context.as_ref().is_some_and(|c| c.line.is_some()) {
        return err;
    }
    err.with_context(
        stmt.span
            .context()
            .with_declaration(stmt.target().full_name()),
    )
}

/// A class declared at a plain dotted name, lowered before everything else.
fn is_class_statement(stmt: &Statement) -> bool {
    stmt.doc.as_ref().is_some_and(is_class_doc) && !stmt.target().mentions_prototype()
}

fn is_class_doc(doc: &DocComment) -> bool {
    doc.has(&Tag::Constructor) || doc.has(&Tag::Interface) || doc.has(&Tag::Record)
}

fn doc_info(doc: &DocComment) -> DocInfo {
    DocInfo {
        description: doc.description.clone(),
        deprecated: doc.find(&Tag::Deprecated).map(|t| t.text.clone()),
        see: doc.all(&Tag::See).map(|t| t.text.clone()).collect(),
        no_side_effects: doc.has(&Tag::NoSideEffects),
    }
}

/// The type written on a tag, without parameter modifiers.
fn tag_type(tag: &DocTag) -> Option<TypeExpr> {
    tag.ty.as_ref().map(|t| t.expr.clone())
}

fn lower_class(stmt: &Statement, doc: &DocComment, options: LoadOptions) -> Result<ClassDeclaration> {
    let Some(params) = stmt.stub_params() else {
        return Err(Error::malformed(format!(
            "{} is tagged as a class but is not a function stub",
            stmt.target()
        )));
    };

    let extends = match doc.find(&Tag::Extends) {
        Some(tag) => Some(SuperRef::new(type_name(tag)?)),
        None => None,
    };
    let implements = doc
        .all(&Tag::Implements)
        .map(type_name)
        .collect::<Result<Vec<_>>>()?;

    Ok(ClassDeclaration {
        extends,
        implements,
        is_interface: !doc.has(&Tag::Constructor),
        constructor: lower_signature(params, doc, options, &stmt.target())?,
        instance_members: Vec::new(),
        static_members: Vec::new(),
        template: doc.template_names(),
    })
}

/// The declaration name an `@extends` or `@implements` tag points at.
fn type_name(tag: &DocTag) -> Result<String> {
    match tag_type(tag) {
        Some(TypeExpr::Named(name) | TypeExpr::Applied(name, _)) => Ok(name),
        Some(other) => Err(Error::malformed(format!(
            "{} needs a class name, got {other}",
            tag.tag
        ))),
        None => Err(Error::malformed(format!("{} without a type", tag.tag))),
    }
}

fn lower_typedef(stmt: &Statement, doc: &DocComment) -> Result<TypeExpr> {
    if stmt.value().is_some() || matches!(stmt.kind, StatementKind::Function { .. }) {
        return Err(Error::malformed(format!(
            "typedef {} must be a bare declaration",
            stmt.target()
        )));
    }
    doc.find(&Tag::Typedef)
        .and_then(tag_type)
        .ok_or_else(|| Error::malformed(format!("@typedef {} has no type", stmt.target())))
}

/// Lowers a statement that is neither a class nor a typedef: a function,
/// method, property, enum, or namespace.
fn lower_member(stmt: &Statement, doc: &DocComment, options: LoadOptions) -> Result<DeclarationKind> {
    if let Some(tag) = doc.find(&Tag::Extends).or_else(|| doc.find(&Tag::Implements)) {
        return Err(Error::malformed(format!(
            "@{} on {}, which is not tagged @constructor, @interface or @record",
            tag.tag,
            stmt.target()
        ))
        .with_context(tag.span.context()));
    }
    if let Some(params) = stmt.stub_params() {
        let sig = lower_signature(params, doc, options, &stmt.target())?;
        return Ok(DeclarationKind::Function(sig));
    }
    if doc.has(&Tag::Param) {
        return Err(Error::malformed(format!(
            "@param on {}, which is not a function stub",
            stmt.target()
        )));
    }

    let declared = doc
        .find(&Tag::Type)
        .or_else(|| doc.find(&Tag::Const))
        .and_then(tag_type);
    let constant = doc.has(&Tag::Const);

    if let Some(enum_tag) = doc.find(&Tag::Enum) {
        let Some(Expr::Object(entries)) = stmt.value() else {
            return Err(Error::malformed(format!(
                "@enum {} needs an object literal",
                stmt.target()
            )));
        };
        return Ok(DeclarationKind::Variable(VariableDeclaration {
            ty: tag_type(enum_tag).unwrap_or(TypeExpr::Primitive(Primitive::Number)),
            constant: true,
            namespace: false,
            enum_members: entries.iter().map(|e| e.key.clone()).collect(),
        }));
    }

    let var = match (stmt.value(), declared) {
        (Some(value), None) if value.is_empty_object() && !constant => {
            VariableDeclaration::namespace()
        }
        (_, Some(ty)) => VariableDeclaration {
            constant,
            ..VariableDeclaration::typed(ty)
        },
        (Some(Expr::Literal(lit)), None) => VariableDeclaration {
            constant,
            ..VariableDeclaration::typed(TypeExpr::Primitive(match lit {
                Literal::String(_) => Primitive::String,
                Literal::Number(_) => Primitive::Number,
            }))
        },
        (_, None) => VariableDeclaration {
            constant,
            ..VariableDeclaration::typed(TypeExpr::Any)
        },
    };
    Ok(DeclarationKind::Variable(var))
}

/// Builds a signature from the stub's parameter names and the doc tags.
///
/// The stub is authoritative for names and arity; `@param` supplies types.
fn lower_signature(
    stub: &[String],
    doc: &DocComment,
    options: LoadOptions,
    target: &QualifiedName,
) -> Result<FunctionSignature> {
    let mut seen = HashSet::new();
    for tag in doc.params() {
        let Some(name) = tag.name.as_deref() else {
            return Err(Error::malformed(format!("@param without a name on {target}"))
                .with_context(tag.span.context()));
        };
        if !seen.insert(name) {
            return Err(Error::malformed(format!("@param {name} given twice on {target}"))
                .with_context(tag.span.context()));
        }
        if !stub.iter().any(|p| p == name) {
            if options.strict_params {
                return Err(Error::malformed(format!(
                    "@param {name} names no parameter of {target}"
                ))
                .with_context(tag.span.context()));
            }
            trace!(param = name, function = %target, "ignoring @param with no stub parameter");
        }
    }

    let params: Vec<Parameter> = stub
        .iter()
        .map(|name| {
            let tag = doc.params().find(|t| t.name.as_deref() == Some(name.as_str()));
            let written = tag.and_then(|t| t.ty.clone());
            let ParamType {
                expr,
                optional,
                variadic,
            } = written.unwrap_or_else(|| untyped_param(name));
            Parameter {
                name: name.clone(),
                ty: expr,
                optional,
                variadic,
            }
        })
        .collect();

    check_variadic_last(&params).map_err(|message| {
        Error::malformed(format!("{message} in {target}"))
    })?;

    Ok(FunctionSignature {
        params,
        return_type: doc
            .find(&Tag::Return)
            .and_then(tag_type)
            .unwrap_or(TypeExpr::Any),
        this_type: doc.find(&Tag::This).and_then(tag_type),
        template: doc.template_names(),
    })
}

/// Type of a stub parameter with no `@param`, following the naming
/// convention for optional and rest parameters.
fn untyped_param(name: &str) -> ParamType {
    ParamType {
        expr: TypeExpr::Any,
        optional: name.starts_with("opt_"),
        variadic: name == "var_args",
    }
}

impl ambient_language::type_parser::VariadicFlag for Parameter {
    fn is_variadic(&self) -> bool {
        self.variadic
    }
}
