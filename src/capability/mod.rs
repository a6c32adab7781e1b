//! Capability resolution.
//!
//! Every value used as a generator source is asked for its
//! [`CapabilitySet`]: the `map`, `flatMap` and (optionally) `filter`
//! operations it supports, each taking a single continuation. The chain only
//! ever talks to a monad through this mapping, so a monad's own method names
//! never matter.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use bindchain::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Id(i64);
//!
//! impl Value for Id {
//!     type Error = DoError;
//!
//!     fn capabilities(&self) -> Option<CapabilitySet<Self>> {
//!         let inner = self.clone();
//!         let bound = self.clone();
//!         Some(CapabilitySet::new(
//!             move |body: Body<Self>| body(inner.clone()),
//!             move |body: Body<Self>| body(bound.clone()),
//!         ))
//!     }
//! }
//!
//! let capabilities = resolve(&Id(4), 0).unwrap();
//! assert!(capabilities.has(Capability::FlatMap));
//! assert!(!capabilities.has(Capability::Filter));
//!
//! let doubled: Body<Id> = Arc::new(|Id(n)| Ok(Id(n * 2)));
//! let result = capabilities.invoke(
//!     Site::generator(0),
//!     Capability::Map,
//!     Continuation::Body(doubled),
//! );
//! assert_eq!(result, Ok(Id(8)));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::DoError;
use crate::value::Value;

/// The three operations a monad-like value may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Transforms the wrapped value; used for the innermost generator.
    Map,
    /// Binds the wrapped value to a continuation returning a wrapped value.
    FlatMap,
    /// Keeps or drops the wrapped value according to a predicate.
    Filter,
}

impl Capability {
    /// All capabilities, in declaration order.
    pub const ALL: [Self; 3] = [Self::Map, Self::FlatMap, Self::Filter];

    /// The canonical name of this capability.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::FlatMap => "flatMap",
            Self::Filter => "filter",
        }
    }

    /// Looks a capability up by its canonical name.
    ///
    /// `flat_map` is accepted as a spelling of `flatMap`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "map" => Some(Self::Map),
            "flatMap" | "flat_map" => Some(Self::FlatMap),
            "filter" => Some(Self::Filter),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// The continuation handed to `map` and `flatMap`.
///
/// For `map` it returns the final (unwrapped) result; for `flatMap` it
/// returns the wrapped result of the nested chain.
pub type Body<V> = Arc<dyn Fn(V) -> Result<V, <V as Value>::Error> + Send + Sync>;

/// The continuation handed to `filter`.
pub type Predicate<V> = Arc<dyn Fn(&V) -> Result<bool, <V as Value>::Error> + Send + Sync>;

type Operation<V> = Arc<dyn Fn(Body<V>) -> Result<V, <V as Value>::Error> + Send + Sync>;

type FilterOperation<V> =
    Arc<dyn Fn(Predicate<V>) -> Result<V, <V as Value>::Error> + Send + Sync>;

/// A continuation of either shape.
pub enum Continuation<V: Value> {
    /// For `map` and `flatMap`.
    Body(Body<V>),
    /// For `filter`.
    Predicate(Predicate<V>),
}

impl<V: Value> Continuation<V> {
    /// Returns `true` if this continuation has the shape `capability` takes.
    #[must_use]
    pub fn accepts(&self, capability: Capability) -> bool {
        matches!(
            (capability, self),
            (Capability::Map | Capability::FlatMap, Self::Body(_))
                | (Capability::Filter, Self::Predicate(_))
        )
    }
}

impl<V: Value> Clone for Continuation<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Body(body) => Self::Body(Arc::clone(body)),
            Self::Predicate(predicate) => Self::Predicate(Arc::clone(predicate)),
        }
    }
}

impl<V: Value> fmt::Debug for Continuation<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body(_) => formatter.write_str("Continuation::Body(<closure>)"),
            Self::Predicate(_) => formatter.write_str("Continuation::Predicate(<closure>)"),
        }
    }
}

/// Identifies where in a chain a capability is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Site {
    /// Zero-based index of the generator.
    pub depth: usize,
    /// Zero-based index of the guard on that generator, for `filter` calls.
    pub guard: Option<usize>,
}

impl Site {
    /// The site of a generator's own `map` or `flatMap`.
    #[must_use]
    pub const fn generator(depth: usize) -> Self {
        Self { depth, guard: None }
    }

    /// The site of the `guard`-th filter on generator `depth`.
    #[must_use]
    pub const fn guard(depth: usize, guard: usize) -> Self {
        Self {
            depth,
            guard: Some(guard),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.guard {
            Some(guard) => write!(formatter, "generator {} guard {guard}", self.depth),
            None => write!(formatter, "generator {}", self.depth),
        }
    }
}

/// The capability mapping a value exposes.
///
/// `map` and `flatMap` are mandatory; `filter` is only needed when a guard
/// follows the generator that draws from this value.
pub struct CapabilitySet<V: Value> {
    map: Operation<V>,
    flat_map: Operation<V>,
    filter: Option<FilterOperation<V>>,
}

impl<V: Value> CapabilitySet<V> {
    /// Creates a set exposing `map` and `flatMap`.
    pub fn new<M, B>(map: M, flat_map: B) -> Self
    where
        M: Fn(Body<V>) -> Result<V, V::Error> + Send + Sync + 'static,
        B: Fn(Body<V>) -> Result<V, V::Error> + Send + Sync + 'static,
    {
        Self {
            map: Arc::new(map),
            flat_map: Arc::new(flat_map),
            filter: None,
        }
    }

    /// Adds a `filter` operation.
    ///
    /// The operation decides on its own what a failed predicate produces,
    /// typically the monad's empty or absent variant.
    #[must_use]
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(Predicate<V>) -> Result<V, V::Error> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Returns `true` if `capability` is exposed.
    #[must_use]
    pub const fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Map | Capability::FlatMap => true,
            Capability::Filter => self.filter.is_some(),
        }
    }

    /// Calls `capability` with `continuation`.
    ///
    /// # Errors
    ///
    /// - [`DoError::MissingCapability`] if `capability` is not exposed;
    ///   `site` names the generator in the error.
    /// - [`DoError::InvalidContinuation`] if `continuation` has the wrong
    ///   shape for `capability`.
    /// - Anything the capability itself returns, unchanged.
    pub fn invoke(
        &self,
        site: Site,
        capability: Capability,
        continuation: Continuation<V>,
    ) -> Result<V, V::Error> {
        match (capability, continuation) {
            (Capability::Map, Continuation::Body(body)) => (self.map)(body),
            (Capability::FlatMap, Continuation::Body(body)) => (self.flat_map)(body),
            (Capability::Filter, continuation) => {
                let filter = self.filter.as_ref().ok_or(DoError::MissingCapability {
                    capability,
                    depth: site.depth,
                })?;
                match continuation {
                    Continuation::Predicate(predicate) => filter(predicate),
                    Continuation::Body(_) => {
                        Err(DoError::InvalidContinuation { capability }.into())
                    }
                }
            }
            (capability, Continuation::Predicate(_)) => {
                Err(DoError::InvalidContinuation { capability }.into())
            }
        }
    }
}

impl<V: Value> Clone for CapabilitySet<V> {
    fn clone(&self) -> Self {
        Self {
            map: Arc::clone(&self.map),
            flat_map: Arc::clone(&self.flat_map),
            filter: self.filter.clone(),
        }
    }
}

impl<V: Value> fmt::Debug for CapabilitySet<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exposed: Vec<&str> = Capability::ALL
            .into_iter()
            .filter(|capability| self.has(*capability))
            .map(Capability::name)
            .collect();
        formatter
            .debug_struct("CapabilitySet")
            .field("exposed", &exposed)
            .finish()
    }
}

/// Resolves the capabilities of a generator source.
///
/// `depth` is the index of the generator, reported on failure.
///
/// # Errors
///
/// Returns [`DoError::UnsupportedValue`] if `value` exposes no capability
/// mapping.
pub fn resolve<V: Value>(value: &V, depth: usize) -> Result<CapabilitySet<V>, DoError> {
    value
        .capabilities()
        .ok_or(DoError::UnsupportedValue { depth })
}
