//! The clause IR: the compiler's only input shape.
//!
//! A comprehension is an ordered list of [`Clause`]s followed by a final
//! expression. Generators bind the values drawn from a source; guards filter
//! on the bindings of the generator they follow.
//!
//! Sequences are normally assembled with [`ClauseSequence::builder`], which
//! plays the role of a front-end: it records generators, guards and the
//! lexical values the comprehension closes over, and validates the shape on
//! [`build`](ClauseSequenceBuilder::build).
//!
//! # Examples
//!
//! ```rust
//! use bindchain::prelude::*;
//! # #[derive(Debug, Clone, PartialEq)]
//! # struct Number(i64);
//! # impl Value for Number {
//! #     type Error = DoError;
//! #     fn capabilities(&self) -> Option<CapabilitySet<Self>> { None }
//! # }
//!
//! let sequence = ClauseSequence::builder()
//!     .bind("v1", Expression::constant(Number(1)))
//!     .guard(Expression::new(["v1"], |_: &Scope<Number>| Ok(true)))
//!     .bind("v2", Expression::name("v1"))
//!     .build()
//!     .unwrap();
//! assert_eq!(sequence.generator_count(), 2);
//! assert_eq!(sequence.guard_count(), 1);
//!
//! let leading_guard = ClauseSequence::<Number>::builder()
//!     .guard(Expression::new(std::iter::empty::<Name>(), |_| Ok(true)))
//!     .build();
//! assert_eq!(
//!     leading_guard.unwrap_err(),
//!     DoError::MalformedSequence(MalformedReason::LeadingGuard)
//! );
//! ```

mod expression;
mod name;
mod pattern;
mod scope;

pub use expression::Expression;
pub use name::Name;
pub use pattern::Pattern;
pub use scope::{Environment, Scope};

use rustc_hash::FxHashSet;

use crate::error::{DoError, MalformedReason};
use crate::value::Value;

/// One clause of a comprehension.
#[derive(Debug, Clone)]
pub enum Clause<V: Value> {
    /// Draws values from `source` and binds each to `pattern`.
    ///
    /// `source` is evaluated once per entry into this nesting level, in the
    /// scope of every name bound before it.
    Generator {
        /// The names this generator binds.
        pattern: Pattern,
        /// The wrapped value to draw from.
        source: Expression<V>,
    },
    /// Filters on the bindings of the immediately preceding generator.
    Guard {
        /// Evaluated after the generator binds, before any later generator.
        predicate: Expression<V, bool>,
    },
}

impl<V: Value> Clause<V> {
    /// Creates a generator clause.
    pub fn generator(pattern: impl Into<Pattern>, source: Expression<V>) -> Self {
        Self::Generator {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a guard clause.
    pub fn guard(predicate: Expression<V, bool>) -> Self {
        Self::Guard { predicate }
    }

    /// The names bound by this clause; empty for guards.
    #[must_use]
    pub fn bound_names(&self) -> Vec<Name> {
        match self {
            Self::Generator { pattern, .. } => pattern.names(),
            Self::Guard { .. } => Vec::new(),
        }
    }

    /// Returns `true` for generator clauses.
    #[must_use]
    pub const fn is_generator(&self) -> bool {
        matches!(self, Self::Generator { .. })
    }
}

/// A validated, non-empty list of clauses plus the captured environment.
///
/// # Invariants
///
/// - The first clause is a generator.
/// - No name is bound by more than one generator.
#[derive(Debug, Clone)]
pub struct ClauseSequence<V: Value> {
    clauses: Vec<Clause<V>>,
    environment: Environment<V>,
}

impl<V: Value> ClauseSequence<V> {
    /// Validates `clauses` and pairs them with the captured `environment`.
    ///
    /// # Errors
    ///
    /// Returns [`DoError::MalformedSequence`] when the sequence is empty,
    /// starts with a guard, or binds a name twice.
    pub fn new(clauses: Vec<Clause<V>>, environment: Environment<V>) -> Result<Self, DoError> {
        match clauses.first() {
            None => return Err(MalformedReason::Empty.into()),
            Some(Clause::Guard { .. }) => return Err(MalformedReason::LeadingGuard.into()),
            Some(Clause::Generator { .. }) => {}
        }

        let mut bound: FxHashSet<Name> = FxHashSet::default();
        for name in clauses.iter().flat_map(Clause::bound_names) {
            if !bound.insert(name.clone()) {
                return Err(MalformedReason::DuplicateName(name).into());
            }
        }

        Ok(Self {
            clauses,
            environment,
        })
    }

    /// Starts building a sequence.
    #[must_use]
    pub fn builder() -> ClauseSequenceBuilder<V> {
        ClauseSequenceBuilder::new()
    }

    /// The clauses in source order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause<V>] {
        &self.clauses
    }

    /// The captured lexical bindings.
    #[must_use]
    pub const fn environment(&self) -> &Environment<V> {
        &self.environment
    }

    /// Number of generator clauses.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.clauses.iter().filter(|clause| clause.is_generator()).count()
    }

    /// Number of guard clauses.
    #[must_use]
    pub fn guard_count(&self) -> usize {
        self.clauses.len() - self.generator_count()
    }

    /// Splits the sequence into its clauses and environment.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Clause<V>>, Environment<V>) {
        (self.clauses, self.environment)
    }
}

/// Incremental construction of a [`ClauseSequence`].
#[derive(Debug, Clone)]
pub struct ClauseSequenceBuilder<V: Value> {
    clauses: Vec<Clause<V>>,
    environment: Environment<V>,
}

impl<V: Value> ClauseSequenceBuilder<V> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
            environment: Environment::new(),
        }
    }

    /// Appends a generator binding `pattern` to values drawn from `source`.
    #[must_use]
    pub fn bind(mut self, pattern: impl Into<Pattern>, source: Expression<V>) -> Self {
        self.clauses.push(Clause::generator(pattern, source));
        self
    }

    /// Appends a guard on the most recent generator.
    #[must_use]
    pub fn guard(mut self, predicate: Expression<V, bool>) -> Self {
        self.clauses.push(Clause::guard(predicate));
        self
    }

    /// Captures a value from the enclosing scope under `name`.
    #[must_use]
    pub fn capture(mut self, name: impl Into<Name>, value: V) -> Self {
        self.environment.insert(name.into(), value);
        self
    }

    /// Validates and returns the sequence.
    ///
    /// # Errors
    ///
    /// See [`ClauseSequence::new`].
    pub fn build(self) -> Result<ClauseSequence<V>, DoError> {
        ClauseSequence::new(self.clauses, self.environment)
    }
}

impl<V: Value> Default for ClauseSequenceBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
