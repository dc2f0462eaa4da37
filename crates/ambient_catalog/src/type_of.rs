//! Reference expressions and `typeOf` evaluation.
//!
//! A reference expression is a dotted path, optionally followed by a call
//! suffix:
//!
//! ```text
//! https.globalAgent            the declared type
//! https.request()              the return type
//! https.request(options)       the type of parameter `options`
//! https.request(0)             the type of the first parameter
//! https.ConnectOptions.agent   a record field or instance member
//! ```

use std::fmt;

use ambient_foundation::{Error, ErrorKind, QualifiedName, Result, TypeExpr};

use crate::catalog::Catalog;
use crate::declaration::{Declaration, DeclarationKind, FunctionSignature};

/// A parsed reference expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// The dotted path.
    pub path: QualifiedName,
    /// The call suffix, if any.
    pub call: Option<CallSuffix>,
}

/// What a call suffix selects from a function type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallSuffix {
    /// `path()`: the return type.
    Return,
    /// `path(name)`: a parameter by name.
    Param(String),
    /// `path(2)`: a parameter by zero-based position.
    Position(usize),
}

impl Reference {
    /// Parses a reference expression.
    ///
    /// # Errors
    /// Returns `ParseError` if the text is not `path`, `path()`, or
    /// `path(param)`.
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        let (path_text, call) = match trimmed.find('(') {
            Some(open) => {
                let Some(inner) = trimmed[open + 1..].strip_suffix(')') else {
                    return Err(syntax_error(text, open + 1, "expected ')' at end"));
                };
                let inner = inner.trim();
                let call = if inner.is_empty() {
                    CallSuffix::Return
                } else if let Ok(index) = inner.parse::<usize>() {
                    CallSuffix::Position(index)
                } else if is_identifier(inner) {
                    CallSuffix::Param(inner.to_string())
                } else {
                    return Err(syntax_error(text, open + 2, "expected a parameter name"));
                };
                (&trimmed[..open], Some(call))
            }
            None => (trimmed, None),
        };

        let mut column = 1;
        for segment in path_text.split('.') {
            if !is_identifier(segment.trim()) {
                return Err(syntax_error(text, column, "expected a dotted name"));
            }
            column += segment.len() + 1;
        }

        Ok(Self {
            path: QualifiedName::new(
                path_text.split('.').map(|s| s.trim().to_string()).collect(),
            ),
            call,
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        match &self.call {
            None => Ok(()),
            Some(CallSuffix::Return) => write!(f, "()"),
            Some(CallSuffix::Param(name)) => write!(f, "({name})"),
            Some(CallSuffix::Position(index)) => write!(f, "({index})"),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn syntax_error(text: &str, column: usize, message: &str) -> Error {
    Error::new(ErrorKind::ParseError {
        message: format!("{message} in reference `{text}`"),
        line: 1,
        column: u32::try_from(column).unwrap_or(u32::MAX),
    })
}

/// A type reached while walking a reference, with the signature it came
/// from when it is a declared function.
struct Step<'a> {
    ty: TypeExpr,
    signature: Option<&'a FunctionSignature>,
    /// Typedefs already expanded to reach `ty`.
    chain: Vec<String>,
}

impl<'a> Step<'a> {
    fn of(decl: &'a Declaration) -> Self {
        let (signature, chain) = match &decl.kind {
            DeclarationKind::Function(sig) => (Some(sig), Vec::new()),
            DeclarationKind::Class(class) => (Some(&class.constructor), Vec::new()),
            DeclarationKind::Typedef(_) => (None, vec![decl.name.full_name()]),
            DeclarationKind::Variable(_) => (None, Vec::new()),
        };
        Self {
            ty: decl.declared_type(),
            signature,
            chain,
        }
    }

    fn plain(ty: TypeExpr) -> Self {
        Self {
            ty,
            signature: None,
            chain: Vec::new(),
        }
    }
}

impl Catalog {
    /// Evaluates a reference expression to its declared type.
    ///
    /// The longest prefix of the path that resolves gives the starting
    /// declaration; the remaining segments step through record fields or
    /// class instance members. The result has its top-level typedef names
    /// substituted.
    ///
    /// # Errors
    /// Returns `ParseError` for bad syntax, `NotFound` if the path or a
    /// step does not resolve, and `CyclicTypedef` if expansion loops.
    pub fn type_of(&self, expression: &str) -> Result<TypeExpr> {
        let reference = Reference::parse(expression)?;
        self.type_of_reference(&reference)
    }

    /// Like [`Catalog::type_of`], for an already-parsed reference.
    ///
    /// # Errors
    /// Returns `NotFound` or `CyclicTypedef` as for [`Catalog::type_of`].
    pub fn type_of_reference(&self, reference: &Reference) -> Result<TypeExpr> {
        let segments = &reference.path.segments;
        let (decl, used) = (1..=segments.len())
            .rev()
            .find_map(|n| {
                self.resolve_name(&QualifiedName::new(segments[..n].to_vec()))
                    .map(|decl| (decl, n))
            })
            .ok_or_else(|| Error::not_found(reference.to_string()))?;

        let mut step = Step::of(decl);
        for segment in &segments[used..] {
            step = self.step_into(step, segment, reference)?;
        }

        let Step { ty, chain, .. } = match &reference.call {
            None => step,
            Some(call) => Step::plain(self.apply_call(step, call, reference)?),
        };
        self.expand_from(&ty, chain)
    }

    /// Moves from a type to one of its record fields or instance members.
    fn step_into<'a>(
        &'a self,
        step: Step<'a>,
        segment: &str,
        reference: &Reference,
    ) -> Result<Step<'a>> {
        let ty = self.shape_of(&step.ty, step.chain)?;
        let missing = || Error::not_found(format!("{segment} in {reference}"));

        match &ty {
            TypeExpr::Record(_) => ty
                .record_field(segment)
                .map(|field| Step::plain(field.ty.clone()))
                .ok_or_else(missing),
            TypeExpr::Named(name) | TypeExpr::Applied(name, _) => self
                .lookup_instance_member(name, segment)
                .map(|found| Step::of(found.member))
                .ok_or_else(missing),
            _ => Err(missing()),
        }
    }

    /// Picks the return or parameter type a call suffix names.
    fn apply_call(&self, step: Step<'_>, call: &CallSuffix, reference: &Reference) -> Result<TypeExpr> {
        let missing = |what: &str| Error::not_found(format!("{what} of {reference}"));

        if let Some(sig) = step.signature {
            return match call {
                CallSuffix::Return => Ok(sig.return_type.clone()),
                CallSuffix::Param(name) => sig
                    .param(name)
                    .map(|p| p.ty.clone())
                    .ok_or_else(|| missing(&format!("parameter {name}"))),
                CallSuffix::Position(index) => sig
                    .params
                    .get(*index)
                    .map(|p| p.ty.clone())
                    .ok_or_else(|| missing(&format!("parameter {index}"))),
            };
        }

        let ty = self.shape_of(&step.ty, step.chain)?;
        let Some(func) = ty.as_function() else {
            return Err(missing("call"));
        };
        match call {
            CallSuffix::Return => Ok((*func.return_type).clone()),
            CallSuffix::Position(index) => func
                .params
                .get(*index)
                .map(|p| p.ty.clone())
                .ok_or_else(|| missing(&format!("parameter {index}"))),
            CallSuffix::Param(name) => Err(missing(&format!("named parameter {name}"))),
        }
    }

    /// Expands typedefs and strips `?` until the underlying shape shows.
    fn shape_of(&self, ty: &TypeExpr, mut chain: Vec<String>) -> Result<TypeExpr> {
        let mut shape = self.expand_chain(ty, &mut chain)?;
        while let TypeExpr::Nullable(inner) = shape {
            shape = self.expand_chain(&inner, &mut chain)?;
        }
        Ok(shape)
    }
}
