//! A dispatch handler that reports every capability call through `tracing`.

use super::{DefaultDispatch, DispatchHandler};
use crate::capability::{Capability, CapabilitySet, Continuation, Site};
use crate::value::Value;

/// Wraps another handler and emits a `tracing` event per capability call.
///
/// Calls are logged at `TRACE` with the generator depth, the guard index (for
/// filters) and the capability name. A failing call is additionally logged at
/// `DEBUG`. Results are passed through untouched.
///
/// # Examples
///
/// ```rust
/// use bindchain::prelude::*;
///
/// let evaluator = Evaluator::new(TracingDispatch::new(DefaultDispatch));
/// # let _ = evaluator;
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingDispatch<D = DefaultDispatch> {
    inner: D,
}

impl<D> TracingDispatch<D> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: D) -> Self {
        Self { inner }
    }

    /// Returns the wrapped handler.
    #[must_use]
    pub const fn inner(&self) -> &D {
        &self.inner
    }
}

impl<V, D> DispatchHandler<V> for TracingDispatch<D>
where
    V: Value,
    D: DispatchHandler<V>,
{
    fn invoke(
        &self,
        site: Site,
        capability: Capability,
        capabilities: &CapabilitySet<V>,
        continuation: Continuation<V>,
    ) -> Result<V, V::Error> {
        tracing::trace!(
            depth = site.depth,
            guard = ?site.guard,
            capability = capability.name(),
            exposed = capabilities.has(capability),
            "dispatching capability"
        );
        let result = self
            .inner
            .invoke(site, capability, capabilities, continuation);
        if result.is_err() {
            tracing::debug!(
                depth = site.depth,
                guard = ?site.guard,
                capability = capability.name(),
                "capability call failed"
            );
        }
        result
    }
}
