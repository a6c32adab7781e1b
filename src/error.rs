//! Error types raised by the comprehension core.
//!
//! Every failure the core itself can produce is a [`DoError`]. Errors raised
//! by caller-supplied closures never pass through this type: they live in the
//! caller's own [`Value::Error`](crate::value::Value::Error) type, which only
//! needs to be constructible from a `DoError`.
//!
//! # Examples
//!
//! ```rust
//! use bindchain::error::{DoError, MalformedReason};
//!
//! let error = DoError::MalformedSequence(MalformedReason::LeadingGuard);
//! assert_eq!(
//!     format!("{error}"),
//!     "malformed clause sequence: a guard cannot precede the first generator"
//! );
//! ```

use crate::capability::Capability;
use crate::clause::Name;

/// Describes why a clause sequence was rejected at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The sequence contains no clauses at all.
    Empty,
    /// The first clause is a guard, so there is nothing to filter yet.
    LeadingGuard,
    /// Two generators bind the same name.
    DuplicateName(Name),
    /// An expression declares a read of a name that is neither bound before
    /// it nor captured from the enclosing scope.
    UnboundName {
        /// The unresolved name.
        name: Name,
        /// Index of the clause (or `clauses.len()` for the final expression).
        clause: usize,
    },
}

impl std::fmt::Display for MalformedReason {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(formatter, "the sequence has no clauses"),
            Self::LeadingGuard => {
                write!(formatter, "a guard cannot precede the first generator")
            }
            Self::DuplicateName(name) => {
                write!(formatter, "name `{name}` is bound more than once")
            }
            Self::UnboundName { name, clause } => {
                write!(formatter, "clause {clause} reads unbound name `{name}`")
            }
        }
    }
}

/// Errors produced by compiling or evaluating a comprehension.
///
/// All variants are terminal for the evaluation in progress: there is no
/// partial result and no default substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoError {
    /// Structural violation detected while building or compiling a sequence.
    MalformedSequence(MalformedReason),
    /// A generator source exposes no capability mapping at all.
    UnsupportedValue {
        /// Index of the generator whose source was rejected.
        depth: usize,
    },
    /// A capability mapping lacks the operation the chain needs.
    MissingCapability {
        /// The absent capability.
        capability: Capability,
        /// Index of the generator the capability was requested for.
        depth: usize,
    },
    /// A dispatch handler passed a continuation of the wrong shape,
    /// e.g. a predicate to `map`.
    InvalidContinuation {
        /// The capability that received the mismatched continuation.
        capability: Capability,
    },
    /// A bound value did not split into the arity its tuple pattern expects.
    PatternMismatch {
        /// Arity the pattern expected.
        expected: usize,
        /// Index of the generator whose pattern failed.
        depth: usize,
    },
    /// A closure looked up a name absent from its scope.
    UnboundName(Name),
}

impl std::fmt::Display for DoError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedSequence(reason) => {
                write!(formatter, "malformed clause sequence: {reason}")
            }
            Self::UnsupportedValue { depth } => write!(
                formatter,
                "generator {depth}: source value exposes no capabilities"
            ),
            Self::MissingCapability { capability, depth } => write!(
                formatter,
                "generator {depth}: capability `{capability}` is not supported"
            ),
            Self::InvalidContinuation { capability } => write!(
                formatter,
                "capability `{capability}` received a continuation of the wrong kind"
            ),
            Self::PatternMismatch { expected, depth } => write!(
                formatter,
                "generator {depth}: bound value does not destructure into {expected} parts"
            ),
            Self::UnboundName(name) => write!(formatter, "name `{name}` is not in scope"),
        }
    }
}

impl std::error::Error for DoError {}

impl From<MalformedReason> for DoError {
    fn from(reason: MalformedReason) -> Self {
        Self::MalformedSequence(reason)
    }
}
