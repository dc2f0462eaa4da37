//! Declaration model.
//!
//! Every entry in a catalog is a [`Declaration`]: a fully-qualified name,
//! a [`DeclarationKind`], and the bits of the doc comment worth keeping.
//! Class members are declarations too, owned by their [`ClassDeclaration`].

use ambient_foundation::{FnParam, FunctionContext, FunctionType, QualifiedName, TypeExpr};
use ambient_language::Span;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named entry in the catalog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// Fully-qualified dotted name.
    pub name: QualifiedName,
    /// What is declared.
    pub kind: DeclarationKind,
    /// Documentation carried over from the doc comment.
    pub doc: DocInfo,
    /// Where the declaring statement is.
    pub span: Span,
    /// Name of the declaration source.
    pub source: String,
}

impl Declaration {
    /// Returns the class declaration, if this is one.
    #[must_use]
    pub const fn as_class(&self) -> Option<&ClassDeclaration> {
        match &self.kind {
            DeclarationKind::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Returns the function signature of a function or method.
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            DeclarationKind::Function(sig) => Some(sig),
            _ => None,
        }
    }

    /// Returns true for an untyped namespace object like `var https = {};`.
    #[must_use]
    pub const fn is_namespace(&self) -> bool {
        matches!(&self.kind, DeclarationKind::Variable(v) if v.namespace)
    }

    /// Returns the type a reference to this declaration has.
    ///
    /// Classes evaluate to their constructor, `function(new:C, ...)`.
    #[must_use]
    pub fn declared_type(&self) -> TypeExpr {
        match &self.kind {
            DeclarationKind::Class(class) => {
                let mut ctor = class.constructor.to_function_type();
                ctor.context = Some(FunctionContext::New(Box::new(TypeExpr::named(
                    self.name.full_name(),
                ))));
                TypeExpr::Function(ctor)
            }
            DeclarationKind::Function(sig) => TypeExpr::Function(sig.to_function_type()),
            DeclarationKind::Typedef(ty) => ty.clone(),
            DeclarationKind::Variable(var) => var.ty.clone(),
        }
    }

    /// Returns a short word describing the kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match &self.kind {
            DeclarationKind::Class(class) if class.is_interface => "interface",
            DeclarationKind::Class(_) => "class",
            DeclarationKind::Function(_) => "function",
            DeclarationKind::Typedef(_) => "typedef",
            DeclarationKind::Variable(v) if v.namespace => "namespace",
            DeclarationKind::Variable(_) => "variable",
        }
    }
}

/// The four kinds of declaration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeclarationKind {
    /// A constructor or interface with members.
    Class(ClassDeclaration),
    /// A free function, static method, or instance method.
    Function(FunctionSignature),
    /// A named alias for a type expression.
    Typedef(TypeExpr),
    /// A value with a declared type.
    Variable(VariableDeclaration),
}

/// A class or interface.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassDeclaration {
    /// The single supertype, if any.
    pub extends: Option<SuperRef>,
    /// Interfaces named by `@implements`.
    pub implements: Vec<String>,
    /// True for `@interface` and `@record`.
    pub is_interface: bool,
    /// Constructor parameters.
    pub constructor: FunctionSignature,
    /// Prototype members, in declaration order.
    pub instance_members: Vec<Declaration>,
    /// Members of the class itself, in declaration order.
    pub static_members: Vec<Declaration>,
    /// Type parameters from `@template`.
    pub template: Vec<String>,
}

impl ClassDeclaration {
    /// Finds an instance member declared directly on this class.
    #[must_use]
    pub fn instance_member(&self, name: &str) -> Option<&Declaration> {
        self.instance_members
            .iter()
            .find(|m| m.name.simple_name() == name)
    }

    /// Finds a static member declared directly on this class.
    #[must_use]
    pub fn static_member(&self, name: &str) -> Option<&Declaration> {
        self.static_members
            .iter()
            .find(|m| m.name.simple_name() == name)
    }
}

/// Reference to a supertype.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SuperRef {
    /// Dotted name of the supertype.
    pub name: String,
    /// Whether the supertype is in the catalog.
    pub status: SuperStatus,
}

impl SuperRef {
    /// Creates a reference that has not been checked yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: SuperStatus::Unchecked,
        }
    }

    /// Returns true if the supertype lives outside the catalog.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        matches!(self.status, SuperStatus::External)
    }
}

/// Resolution status of a supertype reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SuperStatus {
    /// Not yet checked; only seen while a catalog is being built.
    Unchecked,
    /// Names a class in the catalog.
    Resolved,
    /// Names nothing in the catalog.
    External,
}

/// A function signature with named parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionSignature {
    /// Ordered parameters.
    pub params: Vec<Parameter>,
    /// Declared return type, `Any` when no `@return` was written.
    pub return_type: TypeExpr,
    /// Receiver type from `@this`.
    pub this_type: Option<TypeExpr>,
    /// Type parameters from `@template`.
    pub template: Vec<String>,
}

impl Default for FunctionSignature {
    fn default() -> Self {
        Self {
            params: Vec::new(),
            return_type: TypeExpr::Any,
            this_type: None,
            template: Vec::new(),
        }
    }
}

impl FunctionSignature {
    /// Looks up a parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Returns true if the last parameter is variadic.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }

    /// Converts to an anonymous function type.
    #[must_use]
    pub fn to_function_type(&self) -> FunctionType {
        FunctionType {
            context: self
                .this_type
                .as_ref()
                .map(|t| FunctionContext::This(Box::new(t.clone()))),
            params: self
                .params
                .iter()
                .map(|p| FnParam {
                    ty: p.ty.clone(),
                    optional: p.optional,
                    variadic: p.variadic,
                })
                .collect(),
            return_type: Box::new(self.return_type.clone()),
        }
    }
}

/// A named function parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    /// Name from the stub.
    pub name: String,
    /// Declared type, `Any` when no `@param` was written.
    pub ty: TypeExpr,
    /// Written `T=`.
    pub optional: bool,
    /// Written `...T`.
    pub variadic: bool,
}

/// A variable, property, namespace object, or enum.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableDeclaration {
    /// Declared type, `Any` when untyped.
    pub ty: TypeExpr,
    /// Marked `@const`, or an enum.
    pub constant: bool,
    /// An untyped `{}` that only groups other declarations.
    pub namespace: bool,
    /// Member names of an `@enum`.
    pub enum_members: Vec<String>,
}

impl VariableDeclaration {
    /// Creates a plain variable of the given type.
    #[must_use]
    pub const fn typed(ty: TypeExpr) -> Self {
        Self {
            ty,
            constant: false,
            namespace: false,
            enum_members: Vec::new(),
        }
    }

    /// Creates a namespace object.
    #[must_use]
    pub const fn namespace() -> Self {
        Self {
            ty: TypeExpr::Any,
            constant: false,
            namespace: true,
            enum_members: Vec::new(),
        }
    }

    /// Returns true if this is an `@enum`.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        !self.enum_members.is_empty()
    }
}

/// Documentation kept from the doc comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocInfo {
    /// Free text before the first tag.
    pub description: String,
    /// Text of `@deprecated`, if present.
    pub deprecated: Option<String>,
    /// Links from `@see`.
    pub see: Vec<String>,
    /// Marked `@nosideeffects`.
    pub no_side_effects: bool,
}
