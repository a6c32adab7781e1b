//! The dispatch layer between a compiled chain and its capabilities.
//!
//! Every `map`, `flatMap` and `filter` the evaluator performs goes through a
//! [`DispatchHandler`]. The default, [`DefaultDispatch`], simply calls the
//! resolved capability. Replacing it lets callers add instrumentation,
//! resolve operations differently or change calling conventions without
//! touching the compiler or the evaluator.
//!
//! Any closure or function with the right signature is a handler:
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
//! fn strict(
//!     site: Site,
//!     capability: Capability,
//!     capabilities: &CapabilitySet<Number>,
//!     continuation: Continuation<Number>,
//! ) -> Result<Number, DoError> {
//!     capabilities.invoke(site, capability, continuation)
//! }
//!
//! let evaluator = Evaluator::new(strict);
//! # let _ = evaluator;
//! ```

#[cfg(feature = "tracing")]
mod traced;

#[cfg(feature = "tracing")]
pub use traced::TracingDispatch;

use crate::capability::{Capability, CapabilitySet, Continuation, Site};
use crate::value::Value;

/// Performs one capability call on behalf of a compiled chain.
///
/// # Laws
///
/// A handler that forwards to [`CapabilitySet::invoke`] must not change the
/// result of an evaluation. Handlers that deviate (skipping a guard, for
/// example) change program semantics; that is the caller's decision.
pub trait DispatchHandler<V: Value>: Send + Sync + 'static {
    /// Invokes `capability` from `capabilities` with `continuation`.
    ///
    /// `site` identifies the generator (and guard) the call belongs to.
    ///
    /// # Errors
    ///
    /// Whatever the capability or the continuation returns, plus
    /// [`DoError::MissingCapability`](crate::error::DoError::MissingCapability)
    /// when the capability is absent.
    fn invoke(
        &self,
        site: Site,
        capability: Capability,
        capabilities: &CapabilitySet<V>,
        continuation: Continuation<V>,
    ) -> Result<V, V::Error>;
}

/// Calls the resolved capability directly.
///
/// A missing `filter` is a hard error: a guard is never silently ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultDispatch;

impl DefaultDispatch {
    /// Creates a new `DefaultDispatch`.
    #[must_use]
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

impl<V: Value> DispatchHandler<V> for DefaultDispatch {
    #[inline]
    fn invoke(
        &self,
        site: Site,
        capability: Capability,
        capabilities: &CapabilitySet<V>,
        continuation: Continuation<V>,
    ) -> Result<V, V::Error> {
        capabilities.invoke(site, capability, continuation)
    }
}

impl<V, F> DispatchHandler<V> for F
where
    V: Value,
    F: Fn(Site, Capability, &CapabilitySet<V>, Continuation<V>) -> Result<V, V::Error>
        + Send
        + Sync
        + 'static,
{
    #[inline]
    fn invoke(
        &self,
        site: Site,
        capability: Capability,
        capabilities: &CapabilitySet<V>,
        continuation: Continuation<V>,
    ) -> Result<V, V::Error> {
        self(site, capability, capabilities, continuation)
    }
}
