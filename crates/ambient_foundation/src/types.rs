//! Type expressions for ambient declarations.
//!
//! A [`TypeExpr`] is the parsed form of a type comment such as
//! `?(string|buffer.Buffer)` or `function(http.IncomingMessage)=`.
//! References to other declarations stay as [`TypeExpr::Named`] and are
//! resolved lazily by whoever holds the catalog.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Built-in primitive types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Primitive {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `null`
    Null,
    /// `undefined` (also written `void`)
    Undefined,
    /// `symbol`
    Symbol,
}

impl Primitive {
    /// Looks up a primitive by its source spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            "undefined" | "void" => Some(Self::Undefined),
            "symbol" => Some(Self::Symbol),
            _ => None,
        }
    }

    /// Returns the canonical spelling.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Symbol => "symbol",
        }
    }
}

/// Key type of an object used as a map (`Object.<K, V>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyPrimitive {
    /// String keys.
    String,
    /// Numeric keys.
    Number,
}

impl KeyPrimitive {
    /// Converts a primitive into a map key type, if it can be one.
    #[must_use]
    pub const fn from_primitive(p: Primitive) -> Option<Self> {
        match p {
            Primitive::String => Some(Self::String),
            Primitive::Number => Some(Self::Number),
            _ => None,
        }
    }

    /// Returns the key type as a primitive.
    #[must_use]
    pub const fn as_primitive(self) -> Primitive {
        match self {
            Self::String => Primitive::String,
            Self::Number => Primitive::Number,
        }
    }
}

/// A parameter of a function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FnParam {
    /// Declared parameter type.
    pub ty: TypeExpr,
    /// Written with a trailing `=`.
    pub optional: bool,
    /// Written with a leading `...`.
    pub variadic: bool,
}

impl FnParam {
    /// Creates a required, non-variadic parameter.
    #[must_use]
    pub const fn required(ty: TypeExpr) -> Self {
        Self {
            ty,
            optional: false,
            variadic: false,
        }
    }
}

/// Receiver annotation of a function type: `this:T` or `new:T`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FunctionContext {
    /// The function is called with `this` bound to the given type.
    This(Box<TypeExpr>),
    /// The function is a constructor producing the given type.
    New(Box<TypeExpr>),
}

/// A function type: `function(this:T, A, B=, ...C): R`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FunctionType {
    /// Optional receiver annotation.
    pub context: Option<FunctionContext>,
    /// Ordered parameters.
    pub params: Vec<FnParam>,
    /// Return type (`Any` when not written).
    pub return_type: Box<TypeExpr>,
}

impl FunctionType {
    /// Returns true if the last parameter is variadic.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.variadic)
    }
}

/// A field of a structural record type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecordField {
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub ty: TypeExpr,
    /// The field key is always present, but its value may be null.
    ///
    /// True unless the field was written with a `!` prefix.
    pub nullable: bool,
}

/// Type expression for ambient declarations.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeExpr {
    /// A built-in primitive.
    Primitive(Primitive),
    /// A reference to another declaration by dotted name, resolved lazily.
    Named(String),
    /// `?T`: the inner type or null.
    Nullable(Box<TypeExpr>),
    /// `A|B|C`
    Union(Vec<TypeExpr>),
    /// `Array.<T>`
    ArrayOf(Box<TypeExpr>),
    /// `Object.<K, V>`
    MapOf(KeyPrimitive, Box<TypeExpr>),
    /// A function type.
    Function(FunctionType),
    /// A structural record `{a: T, b: U}`.
    Record(Vec<RecordField>),
    /// A generic application of a named type, like `Promise.<string>`.
    Applied(String, Vec<TypeExpr>),
    /// The unknown type (`*` or `?`).
    Any,
}

impl TypeExpr {
    /// Creates a named reference.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a nullable type.
    #[must_use]
    pub fn nullable(inner: TypeExpr) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array_of(element: TypeExpr) -> Self {
        Self::ArrayOf(Box::new(element))
    }

    /// Creates a map type with the given key and value types.
    #[must_use]
    pub fn map_of(key: KeyPrimitive, value: TypeExpr) -> Self {
        Self::MapOf(key, Box::new(value))
    }

    /// Creates a union, flattening nested unions and collapsing a single member.
    #[must_use]
    pub fn union(members: Vec<TypeExpr>) -> Self {
        let mut flat = Vec::with_capacity(members.len());
        for member in members {
            match member {
                Self::Union(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Self::Union(flat)
        }
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true if null is a member of this type.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            Self::Nullable(_) | Self::Any | Self::Primitive(Primitive::Null) => true,
            Self::Union(members) => members.iter().any(Self::is_nullable),
            _ => false,
        }
    }

    /// Returns the name if this is a [`TypeExpr::Named`] reference.
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the function type, if this is one.
    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Looks up a field of a record type.
    #[must_use]
    pub fn record_field(&self, name: &str) -> Option<&RecordField> {
        match self {
            Self::Record(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Calls `f` with every declaration name this type refers to.
    ///
    /// Includes the base names of generic applications.
    pub fn visit_names<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Named(name) => f(name),
            Self::Applied(base, args) => {
                f(base);
                for arg in args {
                    arg.visit_names(f);
                }
            }
            Self::Nullable(inner) | Self::ArrayOf(inner) | Self::MapOf(_, inner) => {
                inner.visit_names(f);
            }
            Self::Union(members) => {
                for member in members {
                    member.visit_names(f);
                }
            }
            Self::Function(func) => {
                match &func.context {
                    Some(FunctionContext::This(t) | FunctionContext::New(t)) => t.visit_names(f),
                    None => {}
                }
                for param in &func.params {
                    param.ty.visit_names(f);
                }
                func.return_type.visit_names(f);
            }
            Self::Record(fields) => {
                for field in fields {
                    field.ty.visit_names(f);
                }
            }
            Self::Primitive(_) | Self::Any => {}
        }
    }

    /// Formats a member of a union or the operand of `?`, parenthesizing
    /// forms that would otherwise read ambiguously.
    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union(_) | Self::Function(_) => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p.name()),
            Self::Named(name) => write!(f, "{name}"),
            Self::Nullable(inner) => {
                write!(f, "?")?;
                inner.fmt_operand(f)
            }
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    member.fmt_operand(f)?;
                }
                Ok(())
            }
            Self::ArrayOf(element) => write!(f, "Array<{element}>"),
            Self::MapOf(key, value) => write!(f, "Object<{}, {value}>", key.as_primitive().name()),
            Self::Function(func) => {
                write!(f, "function(")?;
                let mut first = true;
                match &func.context {
                    Some(FunctionContext::This(t)) => {
                        write!(f, "this:{t}")?;
                        first = false;
                    }
                    Some(FunctionContext::New(t)) => {
                        write!(f, "new:{t}")?;
                        first = false;
                    }
                    None => {}
                }
                for param in &func.params {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    if param.variadic {
                        write!(f, "...")?;
                    }
                    write!(f, "{}", param.ty)?;
                    if param.optional {
                        write!(f, "=")?;
                    }
                }
                write!(f, ")")?;
                if !func.return_type.is_any() {
                    write!(f, ": {}", func.return_type)?;
                }
                Ok(())
            }
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    let bang = if field.nullable { "" } else { "!" };
                    write!(f, "{}: {bang}{}", field.name, field.ty)?;
                }
                write!(f, "}}")
            }
            Self::Applied(base, args) => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Self::Any => write!(f, "*"),
        }
    }
}

impl fmt::Debug for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "Primitive({})", p.name()),
            Self::Named(name) => write!(f, "Named({name})"),
            Self::Nullable(inner) => write!(f, "Nullable({inner:?})"),
            Self::Union(members) => f.debug_tuple("Union").field(members).finish(),
            Self::ArrayOf(element) => write!(f, "ArrayOf({element:?})"),
            Self::MapOf(key, value) => {
                write!(f, "MapOf({}, {value:?})", key.as_primitive().name())
            }
            Self::Function(func) => f.debug_tuple("Function").field(func).finish(),
            Self::Record(fields) => f.debug_tuple("Record").field(fields).finish(),
            Self::Applied(base, args) => f.debug_tuple("Applied").field(base).field(args).finish(),
            Self::Any => write!(f, "Any"),
        }
    }
}
