//! # bindchain
//!
//! Do-notation for arbitrary monad-like values, compiled from a clause IR
//! into nested `map`/`flatMap`/`filter` continuations.
//!
//! ## Overview
//!
//! A comprehension is an ordered list of generators (`v <- source`) and
//! guards (`if predicate`) followed by a final expression. This crate turns
//! that list into a chain of capability calls against whatever values the
//! sources produce, without those values knowing anything about this crate
//! beyond the [`Value`](value::Value) extension point.
//!
//! - **Clause IR** ([`clause`]): generators, guards, patterns, expressions
//!   with declared reads, and the captured environment.
//! - **Capability Resolver** ([`capability`]): asks a value for its `map`,
//!   `flatMap` and optional `filter`.
//! - **Chain Compiler** ([`compiler`]): nests generators, wraps guards and
//!   works out exactly which names each closure captures.
//! - **Dispatch Handler** ([`dispatch`]): the replaceable layer every
//!   capability call goes through.
//! - **Evaluator** ([`evaluator`]): runs a compiled chain.
//!
//! ## Feature Flags
//!
//! - `tracing` (default): `TracingDispatch` and compile-time events through
//!   the `tracing` crate.
//!
//! ## Example
//!
//! ```rust
//! use bindchain::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Maybe {
//!     Int(i64),
//!     Just(i64),
//!     Nothing,
//! }
//!
//! impl Value for Maybe {
//!     type Error = DoError;
//!
//!     fn capabilities(&self) -> Option<CapabilitySet<Self>> {
//!         let held = match self {
//!             Self::Int(_) => return None,
//!             Self::Just(n) => Some(*n),
//!             Self::Nothing => None,
//!         };
//!         Some(
//!             CapabilitySet::new(
//!                 move |body: Body<Self>| match held {
//!                     Some(n) => match body(Self::Int(n))? {
//!                         Self::Int(mapped) => Ok(Self::Just(mapped)),
//!                         other => Ok(other),
//!                     },
//!                     None => Ok(Self::Nothing),
//!                 },
//!                 move |body: Body<Self>| match held {
//!                     Some(n) => body(Self::Int(n)),
//!                     None => Ok(Self::Nothing),
//!                 },
//!             )
//!             .with_filter(move |predicate: Predicate<Self>| match held {
//!                 Some(n) if predicate(&Self::Int(n))? => Ok(Self::Just(n)),
//!                 _ => Ok(Self::Nothing),
//!             }),
//!         )
//!     }
//! }
//!
//! fn int(scope: &Scope<Maybe>, name: &str) -> Result<i64, DoError> {
//!     match scope.lookup(name)? {
//!         Maybe::Int(n) => Ok(*n),
//!         _ => Err(DoError::UnboundName(Name::from(name))),
//!     }
//! }
//!
//! // v1 <- Just(1); if v1 > 3; v2 <- Just(3); yield v1 + v2
//! let sequence = ClauseSequence::builder()
//!     .bind("v1", Expression::constant(Maybe::Just(1)))
//!     .guard(Expression::new(["v1"], |scope: &Scope<Maybe>| Ok(int(scope, "v1")? > 3)))
//!     .bind("v2", Expression::constant(Maybe::Just(3)))
//!     .build()
//!     .unwrap();
//! let sum = Expression::new(["v1", "v2"], |scope: &Scope<Maybe>| {
//!     Ok(Maybe::Int(int(scope, "v1")? + int(scope, "v2")?))
//! });
//!
//! assert_eq!(compile_and_run(sequence, sum), Ok(Maybe::Nothing));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the types and functions needed to build, compile and run
/// comprehensions.
///
/// # Usage
///
/// ```rust
/// use bindchain::prelude::*;
/// ```
pub mod prelude {
    pub use crate::capability::{
        Body, Capability, CapabilitySet, Continuation, Predicate, Site, resolve,
    };
    pub use crate::clause::{
        Clause, ClauseSequence, ClauseSequenceBuilder, Environment, Expression, Name, Pattern,
        Scope,
    };
    pub use crate::compiler::{CompiledChain, Node, Stage, compile};
    #[cfg(feature = "tracing")]
    pub use crate::dispatch::TracingDispatch;
    pub use crate::dispatch::{DefaultDispatch, DispatchHandler};
    pub use crate::error::{DoError, MalformedReason};
    pub use crate::evaluator::{
        Evaluator, compile_and_run, compile_and_run_with, evaluate, evaluate_with,
    };
    pub use crate::value::Value;
}

pub mod capability;
pub mod clause;
pub mod compiler;
pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod value;
