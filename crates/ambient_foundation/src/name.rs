//! Qualified declaration names.
//!
//! Declarations are addressed by dotted paths such as `https.Server` or
//! `https.Server.prototype.listen`. The `prototype` segment marks an instance
//! member; every other segment is a plain property step.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The path segment that separates a class from its instance members.
pub const PROTOTYPE: &str = "prototype";

/// A dotted declaration path like `https.Server.prototype.listen`.
///
/// Stored as path segments for easy manipulation and comparison.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualifiedName {
    /// Path segments (e.g., `["https", "Server"]` for `https.Server`).
    pub segments: Vec<String>,
}

impl QualifiedName {
    /// Creates a new name from segments.
    #[must_use]
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Creates a name from a dotted string like `https.Server`.
    ///
    /// Empty segments are dropped, so `"a..b"` parses as `a.b`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s
                .split('.')
                .filter(|seg| !seg.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Returns the full dotted name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.segments.join(".")
    }

    /// Returns the simple name (last segment).
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Returns the enclosing name, or `None` for a single-segment name.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Returns a new name with `segment` appended.
    #[must_use]
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this name has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Splits `Owner.prototype.member` into `(Owner, member)`.
    ///
    /// Returns `None` unless the second-to-last segment is `prototype` and the
    /// owner is non-empty.
    #[must_use]
    pub fn split_prototype_member(&self) -> Option<(Self, &str)> {
        let n = self.segments.len();
        if n < 3 || self.segments[n - 2] != PROTOTYPE {
            return None;
        }
        let owner = Self {
            segments: self.segments[..n - 2].to_vec(),
        };
        Some((owner, self.segments[n - 1].as_str()))
    }

    /// Returns true if any segment is `prototype`.
    #[must_use]
    pub fn mentions_prototype(&self) -> bool {
        self.segments.iter().any(|s| s == PROTOTYPE)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
