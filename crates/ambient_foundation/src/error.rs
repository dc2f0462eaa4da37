//! Error types for catalog loading and lookup.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for ambient catalog operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Fills in the source name of the context, creating one if needed.
    ///
    /// An existing source name is kept.
    #[must_use]
    pub fn in_source(mut self, source: impl Into<String>) -> Self {
        let context = self.context.get_or_insert_with(ErrorContext::new);
        if context.source.is_none() {
            context.source = Some(source.into());
        }
        self
    }

    /// Creates a malformed declaration error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDeclaration(message.into()))
    }

    /// Creates a duplicate name error.
    #[must_use]
    pub fn duplicate_name(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateName {
            name: name.into(),
            namespace: namespace.into(),
        })
    }

    /// Creates a cyclic typedef error from the alias chain that closed the cycle.
    #[must_use]
    pub fn cyclic_typedef(cycle: Vec<String>) -> Self {
        Self::new(ErrorKind::CyclicTypedef { cycle })
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound(name.into()))
    }

    /// Creates a lifecycle state error.
    #[must_use]
    pub fn invalid_state(expected: &'static str, actual: &'static str) -> Self {
        Self::new(ErrorKind::InvalidState { expected, actual })
    }

    /// Returns true if this error aborts a catalog load.
    #[must_use]
    pub const fn is_load_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::MalformedDeclaration(_)
                | ErrorKind::DuplicateName { .. }
                | ErrorKind::ParseError { .. }
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// A type comment or stub statement could not be turned into a declaration.
    #[error("malformed declaration: {0}")]
    MalformedDeclaration(String),

    /// Two non-augmenting declarations share a name in one namespace.
    #[error("duplicate name: {name} in {namespace}")]
    DuplicateName {
        /// The simple name that collided.
        name: String,
        /// The namespace the collision happened in.
        namespace: String,
    },

    /// Typedef expansion revisited an alias.
    #[error("cyclic typedef: {}", cycle.join(" -> "))]
    CyclicTypedef {
        /// The aliases visited, ending with the repeated one.
        cycle: Vec<String>,
    },

    /// A name or reference expression did not resolve.
    #[error("not found: {0}")]
    NotFound(String),

    /// An operation was issued in the wrong lifecycle state.
    #[error("invalid catalog state: expected {expected}, found {actual}")]
    InvalidState {
        /// The state the operation requires.
        expected: &'static str,
        /// The state the catalog was in.
        actual: &'static str,
    },

    /// Syntax error in a declaration source or reference expression.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
    },

    /// Snapshot encoding or decoding failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    IoError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Declaration source name (usually a file name).
    pub source: Option<String>,
    /// Line number in source.
    pub line: Option<u32>,
    /// Column number in source.
    pub column: Option<u32>,
    /// The declaration being processed, if any.
    pub declaration: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line and column.
    #[must_use]
    pub fn with_position(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Sets the declaration name.
    #[must_use]
    pub fn with_declaration(mut self, name: impl Into<String>) -> Self {
        self.declaration = Some(name.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if let Some(decl) = &self.declaration {
            if self.source.is_some() {
                write!(f, " ")?;
            }
            write!(f, "in {decl}")?;
        }
        Ok(())
    }
}
