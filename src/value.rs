//! The capability extension point.
//!
//! A comprehension never names the monad it runs over. Instead, every value
//! that flows through a chain implements [`Value`], and the core asks each
//! generator source for its [`CapabilitySet`] at the moment it is used. The
//! names of the monad's own methods (`and_then`, `bind`, `chain`, ...) are
//! irrelevant; only the mapping matters.
//!
//! Because the clause IR is assembled at run time, one type carries both the
//! wrapped values a generator draws from and the plain values its pattern
//! binds. A typical implementation is an enum with one variant per shape.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use bindchain::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Term {
//!     Int(i64),
//!     Just(Box<Term>),
//!     Nothing,
//! }
//!
//! impl Value for Term {
//!     type Error = DoError;
//!
//!     fn capabilities(&self) -> Option<CapabilitySet<Self>> {
//!         let this = self.clone();
//!         let that = self.clone();
//!         match self {
//!             Self::Int(_) => None,
//!             _ => Some(CapabilitySet::new(
//!                 move |body: Body<Self>| match &this {
//!                     Self::Just(inner) => Ok(Self::Just(Box::new(body(inner.as_ref().clone())?))),
//!                     _ => Ok(Self::Nothing),
//!                 },
//!                 move |body: Body<Self>| match &that {
//!                     Self::Just(inner) => body(inner.as_ref().clone()),
//!                     _ => Ok(Self::Nothing),
//!                 },
//!             )),
//!         }
//!     }
//! }
//!
//! assert!(Term::Nothing.capabilities().is_some());
//! assert!(Term::Int(1).capabilities().is_none());
//! ```

use crate::capability::CapabilitySet;
use crate::error::DoError;

/// A value that can take part in a comprehension.
///
/// # Contract
///
/// - [`capabilities`](Value::capabilities) must be referentially
///   transparent: the evaluator may call it once per nesting invocation.
/// - Returning `None` marks the value as unusable as a generator source;
///   evaluation then fails with [`DoError::UnsupportedValue`].
/// - `map` and `flatMap` are always present in a returned set. `filter` is
///   optional and only needed when a guard follows the generator.
pub trait Value: Clone + Send + Sync + 'static {
    /// The caller's error type.
    ///
    /// Errors raised by the core are converted with `From<DoError>`; errors
    /// raised inside caller closures pass through unchanged.
    type Error: From<DoError> + Send + Sync + 'static;

    /// Returns the capability mapping this value exposes, if any.
    fn capabilities(&self) -> Option<CapabilitySet<Self>>;

    /// Splits this value into exactly `arity` parts for a tuple pattern.
    ///
    /// The default implementation supports no destructuring.
    fn destructure(&self, arity: usize) -> Option<Vec<Self>> {
        let _ = arity;
        None
    }
}
