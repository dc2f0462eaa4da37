//! Syntax tree for externs sources.
//!
//! The tree is deliberately shallow: a source is a list of stub statements,
//! each optionally carrying the doc comment that preceded it.

use ambient_foundation::QualifiedName;

use crate::doc::DocComment;
use crate::span::Span;

/// A parsed externs source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceFile {
    /// File-level metadata from a `@fileoverview` / `@externs` comment.
    pub header: Option<FileHeader>,
    /// Module bindings from `BEGIN_NODE_INCLUDE` blocks.
    pub includes: Vec<ModuleInclude>,
    /// Stub statements in source order.
    pub statements: Vec<Statement>,
}

/// File-level metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileHeader {
    /// Text of the `@fileoverview` tag.
    pub overview: Option<String>,
    /// True if the file is marked `@externs`.
    pub externs: bool,
    /// Links from `@see` tags.
    pub see: Vec<String>,
}

impl FileHeader {
    /// Extracts the header fields from a doc comment.
    #[must_use]
    pub fn from_doc(doc: &DocComment) -> Self {
        use crate::doc::Tag;

        Self {
            overview: doc.find(&Tag::FileOverview).map(|t| t.text.clone()),
            externs: doc.has(&Tag::Externs),
            see: doc.all(&Tag::See).map(|t| t.text.clone()).collect(),
        }
    }
}

/// A `var x = require('m');` line inside an include block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInclude {
    /// The local name the module is bound to.
    pub binding: String,
    /// The module specifier passed to `require`.
    pub module: String,
    /// The comment the include came from.
    pub span: Span,
}

/// A stub statement with its doc comment.
#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    /// The doc comment immediately before the statement.
    pub doc: Option<DocComment>,
    /// What the statement says.
    pub kind: StatementKind,
    /// Where the statement is.
    pub span: Span,
}

impl Statement {
    /// Returns the dotted name this statement declares.
    #[must_use]
    pub fn target(&self) -> QualifiedName {
        match &self.kind {
            StatementKind::Var { name, .. } | StatementKind::Function { name, .. } => {
                QualifiedName::new(vec![name.clone()])
            }
            StatementKind::Assign { target, .. } | StatementKind::Declare { target } => {
                target.clone()
            }
        }
    }

    /// Returns the assigned value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Expr> {
        match &self.kind {
            StatementKind::Var { value, .. } => value.as_ref(),
            StatementKind::Assign { value, .. } => Some(value),
            StatementKind::Declare { .. } | StatementKind::Function { .. } => None,
        }
    }

    /// Returns the parameter names of a function stub.
    #[must_use]
    pub fn stub_params(&self) -> Option<&[String]> {
        match &self.kind {
            StatementKind::Function { params, .. } => Some(params),
            _ => match self.value() {
                Some(Expr::Function { params }) => Some(params),
                _ => None,
            },
        }
    }
}

/// The statement forms an externs source may contain.
#[derive(Clone, Debug, PartialEq)]
pub enum StatementKind {
    /// `var a;` or `var a = value;`
    Var {
        /// Declared name.
        name: String,
        /// Initializer, if written.
        value: Option<Expr>,
    },
    /// `a.b.c = value;`
    Assign {
        /// Assigned path.
        target: QualifiedName,
        /// Assigned value.
        value: Expr,
    },
    /// `a.b.c;`
    Declare {
        /// Declared path.
        target: QualifiedName,
    },
    /// `function f(a, b) {}`
    Function {
        /// Function name.
        name: String,
        /// Parameter names.
        params: Vec<String>,
    },
}

/// Right-hand side of a stub assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// `function(a, b) {}`
    Function {
        /// Parameter names.
        params: Vec<String>,
    },
    /// `{}` or `{X: 1, Y: 'y'}`
    Object(Vec<ObjectEntry>),
    /// A dotted path such as `tls.Server`.
    Path(QualifiedName),
    /// A string or number.
    Literal(Literal),
}

impl Expr {
    /// Returns true for the empty object literal `{}`.
    #[must_use]
    pub fn is_empty_object(&self) -> bool {
        matches!(self, Self::Object(entries) if entries.is_empty())
    }
}

/// One `key: value` entry of an object literal.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectEntry {
    /// Property key.
    pub key: String,
    /// Property value.
    pub value: Expr,
}

/// A literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// A string literal.
    String(String),
    /// A number literal.
    Number(f64),
}
