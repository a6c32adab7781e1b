//! Running compiled chains.
//!
//! The [`Evaluator`] walks a [`CompiledChain`] top-down. At each stage it
//! evaluates the generator's source, resolves the capabilities of the
//! resulting value and hands a continuation to the [`DispatchHandler`]:
//!
//! - a filter node dispatches `filter` with a predicate over the stage's
//!   bindings, then carries on with whatever value the capability returned;
//! - a flatMap node dispatches `flatMap` with a closure that binds the drawn
//!   value and runs the next stage;
//! - a map node dispatches `map` with a closure that binds the drawn value
//!   and computes the final expression.
//!
//! The evaluator never invents results of its own: what a failed guard or an
//! empty value produces is entirely up to the capability.
//!
//! # Examples
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
//!         Some(CapabilitySet::new(
//!             move |body: Body<Self>| match held {
//!                 Some(n) => match body(Self::Int(n))? {
//!                     Self::Int(mapped) => Ok(Self::Just(mapped)),
//!                     other => Ok(other),
//!                 },
//!                 None => Ok(Self::Nothing),
//!             },
//!             move |body: Body<Self>| match held {
//!                 Some(n) => body(Self::Int(n)),
//!                 None => Ok(Self::Nothing),
//!             },
//!         ))
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
//! let sequence = ClauseSequence::builder()
//!     .bind("v1", Expression::constant(Maybe::Just(1)))
//!     .bind("v2", Expression::constant(Maybe::Just(2)))
//!     .build()
//!     .unwrap();
//! let sum = Expression::new(["v1", "v2"], |scope: &Scope<Maybe>| {
//!     Ok(Maybe::Int(int(scope, "v1")? + int(scope, "v2")?))
//! });
//!
//! assert_eq!(compile_and_run(sequence, sum), Ok(Maybe::Just(3)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::capability::{Body, Capability, Continuation, Predicate, Site, resolve};
use crate::clause::{ClauseSequence, Expression, Scope};
use crate::compiler::{CompiledChain, FilterNode, FlatMapNode, MapNode, Node, Stage, compile};
use crate::dispatch::{DefaultDispatch, DispatchHandler};
use crate::value::Value;

/// Executes compiled chains through a dispatch handler.
///
/// The handler is shared behind an `Arc`, so cloning an evaluator is cheap
/// and the continuations it hands to capabilities are `'static`. Lazy
/// monads may keep those continuations and call them after
/// [`evaluate`](Self::evaluate) has returned.
///
/// # Examples
///
/// ```rust
/// use bindchain::prelude::*;
///
/// let default: Evaluator = Evaluator::default();
/// let traced = Evaluator::new(TracingDispatch::new(DefaultDispatch));
/// assert_eq!(default.handler(), &DefaultDispatch);
/// assert_eq!(traced.handler().inner(), &DefaultDispatch);
/// ```
pub struct Evaluator<D = DefaultDispatch> {
    handler: Arc<D>,
}

impl<D> Evaluator<D> {
    /// Creates an evaluator that dispatches through `handler`.
    #[must_use]
    pub fn new(handler: D) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Returns the dispatch handler.
    #[must_use]
    pub fn handler(&self) -> &D {
        &self.handler
    }
}

impl<D: Default> Default for Evaluator<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D> Clone for Evaluator<D> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for Evaluator<D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Evaluator")
            .field("handler", &self.handler)
            .finish()
    }
}

impl<D> Evaluator<D> {
    /// Evaluates `chain` and returns the wrapped result.
    ///
    /// Each call is a fresh traversal; nothing is kept between calls.
    ///
    /// # Errors
    ///
    /// - [`DoError::UnsupportedValue`](crate::error::DoError::UnsupportedValue)
    ///   when a source exposes no capabilities.
    /// - [`DoError::MissingCapability`](crate::error::DoError::MissingCapability)
    ///   when a guard meets a value without `filter`.
    /// - [`DoError::PatternMismatch`](crate::error::DoError::PatternMismatch)
    ///   when a drawn value does not fit a tuple pattern.
    /// - Any error raised by a source, guard, final expression or
    ///   capability, unchanged.
    pub fn evaluate<V>(&self, chain: &CompiledChain<V>) -> Result<V, V::Error>
    where
        V: Value,
        D: DispatchHandler<V>,
    {
        self.run_stage(chain.root_stage(), chain.entry())
    }

    fn run_stage<V>(&self, stage: &Arc<Stage<V>>, outer: &Scope<V>) -> Result<V, V::Error>
    where
        V: Value,
        D: DispatchHandler<V>,
    {
        let source = stage.source().evaluate(outer)?;
        let captured = Arc::new(stage.capture(outer));
        self.run_node(stage, source, &captured)
    }

    fn run_node<V>(
        &self,
        stage: &Arc<Stage<V>>,
        source: V,
        captured: &Arc<Scope<V>>,
    ) -> Result<V, V::Error>
    where
        V: Value,
        D: DispatchHandler<V>,
    {
        let depth = stage.depth();
        let mut current = source;
        let mut node = stage.node();
        loop {
            let capabilities = resolve(&current, depth)?;
            match node {
                Node::Filter(filter) => {
                    let predicate = Self::predicate(stage, filter, captured);
                    current = self.handler.invoke(
                        Site::guard(depth, filter.guard()),
                        Capability::Filter,
                        &capabilities,
                        Continuation::Predicate(predicate),
                    )?;
                    node = filter.continuation();
                }
                Node::FlatMap(flat_map) => {
                    let body = self.flat_map_body(stage, flat_map, captured);
                    return self.handler.invoke(
                        Site::generator(depth),
                        Capability::FlatMap,
                        &capabilities,
                        Continuation::Body(body),
                    );
                }
                Node::Map(map) => {
                    let body = Self::map_body(stage, map, captured);
                    return self.handler.invoke(
                        Site::generator(depth),
                        Capability::Map,
                        &capabilities,
                        Continuation::Body(body),
                    );
                }
            }
        }
    }

    fn predicate<V: Value>(
        stage: &Arc<Stage<V>>,
        filter: &FilterNode<V>,
        captured: &Arc<Scope<V>>,
    ) -> Predicate<V> {
        let stage = Arc::clone(stage);
        let captured = Arc::clone(captured);
        let predicate: Expression<V, bool> = filter.predicate().clone();
        Arc::new(move |element: &V| {
            let scope = stage.enter(&captured, element.clone())?;
            predicate.evaluate(&scope)
        })
    }

    fn flat_map_body<V>(
        &self,
        stage: &Arc<Stage<V>>,
        flat_map: &FlatMapNode<V>,
        captured: &Arc<Scope<V>>,
    ) -> Body<V>
    where
        V: Value,
        D: DispatchHandler<V>,
    {
        let evaluator = self.clone();
        let stage = Arc::clone(stage);
        let next = Arc::clone(flat_map.stage());
        let captured = Arc::clone(captured);
        Arc::new(move |element: V| {
            let scope = stage.enter(&captured, element)?;
            evaluator.run_stage(&next, &scope)
        })
    }

    fn map_body<V: Value>(
        stage: &Arc<Stage<V>>,
        map: &MapNode<V>,
        captured: &Arc<Scope<V>>,
    ) -> Body<V> {
        let stage = Arc::clone(stage);
        let captured = Arc::clone(captured);
        let body = map.body().clone();
        Arc::new(move |element: V| {
            let scope = stage.enter(&captured, element)?;
            body.evaluate(&scope)
        })
    }
}

/// Evaluates `chain` with [`DefaultDispatch`].
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate<V: Value>(chain: &CompiledChain<V>) -> Result<V, V::Error> {
    Evaluator::new(DefaultDispatch).evaluate(chain)
}

/// Evaluates `chain` through `handler`.
///
/// # Errors
///
/// See [`Evaluator::evaluate`].
pub fn evaluate_with<V, D>(chain: &CompiledChain<V>, handler: D) -> Result<V, V::Error>
where
    V: Value,
    D: DispatchHandler<V>,
{
    Evaluator::new(handler).evaluate(chain)
}

/// Compiles `sequence` and evaluates it with [`DefaultDispatch`].
///
/// # Errors
///
/// Compilation errors from [`compile`] and evaluation errors from
/// [`Evaluator::evaluate`].
pub fn compile_and_run<V: Value>(
    sequence: ClauseSequence<V>,
    final_expr: Expression<V>,
) -> Result<V, V::Error> {
    compile_and_run_with(sequence, final_expr, DefaultDispatch)
}

/// Compiles `sequence` and evaluates it through `handler`.
///
/// # Errors
///
/// Compilation errors from [`compile`] and evaluation errors from
/// [`Evaluator::evaluate`].
pub fn compile_and_run_with<V, D>(
    sequence: ClauseSequence<V>,
    final_expr: Expression<V>,
    handler: D,
) -> Result<V, V::Error>
where
    V: Value,
    D: DispatchHandler<V>,
{
    let chain = compile(sequence, final_expr)?;
    evaluate_with(&chain, handler)
}
