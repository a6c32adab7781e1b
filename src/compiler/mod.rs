//! The clause-to-continuation compiler.
//!
//! [`compile`] turns a [`ClauseSequence`] and a final expression into a
//! [`CompiledChain`]: one [`Stage`] per generator, nested through
//! `flatMap` nodes, ending in a `map` node for the last generator. Guards
//! become `filter` nodes wrapped around the node of the generator they
//! follow, so they run before that generator's body and before any later
//! source is evaluated.
//!
//! ```text
//! v1 <- a; if p(v1); v2 <- b(v1); yield f(v1, v2)
//!
//! a.filter(|v1| p(v1)).flatMap(|v1| b(v1).map(|v2| f(v1, v2)))
//! ```
//!
//! Compilation is a pure function of its input. It walks the generators
//! from the innermost outwards, so no call-stack recursion is proportional
//! to the length of the sequence.
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
//!     .bind("v1", Expression::constant(Number(1)).labelled("Just(1)"))
//!     .build()
//!     .unwrap();
//! let chain = compile(sequence, Expression::name("v1")).unwrap();
//!
//! assert!(chain.root().node().is_map());
//! assert_eq!(format!("{chain}"), "Just(1).map(|v1| v1)");
//! ```

mod capture;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use self::capture::{Bindings, Captures, NameSet, check_reads, split};
use crate::clause::{Clause, ClauseSequence, Environment, Expression, Name, Pattern, Scope};
use crate::error::{DoError, MalformedReason};
use crate::value::Value;

/// A compiled comprehension, ready for evaluation.
///
/// Immutable and cheap to clone. It can be evaluated any number of times,
/// from any number of threads, as long as the caller's closures and
/// capabilities allow it.
pub struct CompiledChain<V: Value> {
    root: Arc<Stage<V>>,
    entry: Scope<V>,
    generators: usize,
    guards: usize,
}

impl<V: Value> CompiledChain<V> {
    /// The stage of the first generator.
    #[must_use]
    pub fn root(&self) -> &Stage<V> {
        &self.root
    }

    pub(crate) const fn root_stage(&self) -> &Arc<Stage<V>> {
        &self.root
    }

    /// The captured bindings the first generator's source reads.
    #[must_use]
    pub const fn entry(&self) -> &Scope<V> {
        &self.entry
    }

    /// Number of generators (and therefore stages).
    #[must_use]
    pub const fn generator_count(&self) -> usize {
        self.generators
    }

    /// Number of guards (and therefore filter nodes).
    #[must_use]
    pub const fn guard_count(&self) -> usize {
        self.guards
    }
}

impl<V: Value> Clone for CompiledChain<V> {
    fn clone(&self) -> Self {
        Self {
            root: Arc::clone(&self.root),
            entry: self.entry.clone(),
            generators: self.generators,
            guards: self.guards,
        }
    }
}

impl<V: Value + fmt::Debug> fmt::Debug for CompiledChain<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CompiledChain")
            .field("root", &self.root)
            .field("entry", &self.entry)
            .finish()
    }
}

/// Renders the desugared call chain.
impl<V: Value> fmt::Display for CompiledChain<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.root)
    }
}

/// One generator: its source, its pattern and what happens to each value.
#[derive(Debug)]
pub struct Stage<V: Value> {
    depth: usize,
    pattern: Pattern,
    source: Expression<V>,
    carried: Vec<Name>,
    lexical: Environment<V>,
    node: Node<V>,
}

impl<V: Value> Stage<V> {
    /// Zero-based index of this stage's generator.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The pattern each drawn value is bound to.
    #[must_use]
    pub const fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The source expression, evaluated in the enclosing stage's scope.
    #[must_use]
    pub const fn source(&self) -> &Expression<V> {
        &self.source
    }

    /// Names bound by earlier generators that this stage's closures hold.
    #[must_use]
    pub fn carried(&self) -> &[Name] {
        &self.carried
    }

    /// Captured enclosing-scope bindings this stage's closures hold.
    #[must_use]
    pub const fn lexical(&self) -> &Environment<V> {
        &self.lexical
    }

    /// The outermost node applied to the source value.
    #[must_use]
    pub const fn node(&self) -> &Node<V> {
        &self.node
    }

    /// Every outside name this stage's closures hold, carried names first.
    pub fn captured_names(&self) -> impl Iterator<Item = &Name> {
        self.carried.iter().chain(self.lexical.names())
    }

    /// Builds the scope this stage's closures own from the enclosing scope.
    pub(crate) fn capture(&self, outer: &Scope<V>) -> Scope<V> {
        let mut captured = outer.project(&self.carried);
        captured.extend_from(&self.lexical);
        captured
    }

    /// Binds a drawn value on top of the captured scope.
    pub(crate) fn enter(&self, captured: &Scope<V>, element: V) -> Result<Scope<V>, DoError> {
        let mut scope = captured.clone();
        self.pattern.bind(element, self.depth, &mut scope)?;
        Ok(scope)
    }

    fn write_node(&self, node: &Node<V>, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match node {
            Node::Filter(filter) => {
                write!(formatter, ".filter(|{}| ", self.pattern)?;
                match filter.predicate.label() {
                    Some(label) => write!(formatter, "{label})")?,
                    None => write!(formatter, "guard{}_{})", self.depth, filter.guard)?,
                }
                self.write_node(&filter.continuation, formatter)
            }
            Node::Map(map) => {
                let label = map.body.label().unwrap_or("result");
                write!(formatter, ".map(|{}| {label})", self.pattern)
            }
            Node::FlatMap(flat_map) => {
                write!(formatter, ".flatMap(|{}| {})", self.pattern, flat_map.body)
            }
        }
    }
}

impl<V: Value> fmt::Display for Stage<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source.label() {
            Some(label) => formatter.write_str(label)?,
            None => write!(formatter, "source{}", self.depth)?,
        }
        self.write_node(&self.node, formatter)
    }
}

/// A node of the compiled tree.
#[derive(Debug)]
pub enum Node<V: Value> {
    /// Terminal `map` applying the final expression.
    Map(MapNode<V>),
    /// `flatMap` into the next generator's stage.
    FlatMap(FlatMapNode<V>),
    /// `filter` applied before the continuation.
    Filter(FilterNode<V>),
}

impl<V: Value> Node<V> {
    /// Returns `true` for a [`MapNode`].
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Returns `true` for a [`FlatMapNode`].
    #[must_use]
    pub const fn is_flat_map(&self) -> bool {
        matches!(self, Self::FlatMap(_))
    }

    /// Returns `true` for a [`FilterNode`].
    #[must_use]
    pub const fn is_filter(&self) -> bool {
        matches!(self, Self::Filter(_))
    }

    /// The `map` or `flatMap` node under any filters.
    #[must_use]
    pub fn terminal(&self) -> &Self {
        let mut node = self;
        while let Self::Filter(filter) = node {
            node = &filter.continuation;
        }
        node
    }
}

/// Applies the final expression to each value of the last generator.
#[derive(Debug)]
pub struct MapNode<V: Value> {
    body: Expression<V>,
}

impl<V: Value> MapNode<V> {
    /// The final expression.
    #[must_use]
    pub const fn body(&self) -> &Expression<V> {
        &self.body
    }
}

/// Runs the next generator's stage for each value of this one.
#[derive(Debug)]
pub struct FlatMapNode<V: Value> {
    body: Arc<Stage<V>>,
}

impl<V: Value> FlatMapNode<V> {
    /// The nested stage.
    #[must_use]
    pub fn body(&self) -> &Stage<V> {
        &self.body
    }

    pub(crate) const fn stage(&self) -> &Arc<Stage<V>> {
        &self.body
    }
}

/// Filters the source value before the continuation sees it.
#[derive(Debug)]
pub struct FilterNode<V: Value> {
    guard: usize,
    predicate: Expression<V, bool>,
    continuation: Box<Node<V>>,
}

impl<V: Value> FilterNode<V> {
    /// Zero-based index of the guard on its generator.
    #[must_use]
    pub const fn guard(&self) -> usize {
        self.guard
    }

    /// The guard predicate.
    #[must_use]
    pub const fn predicate(&self) -> &Expression<V, bool> {
        &self.predicate
    }

    /// The node applied to the filtered value.
    #[must_use]
    pub fn continuation(&self) -> &Node<V> {
        &self.continuation
    }
}

struct Group<V: Value> {
    pattern: Pattern,
    source: Expression<V>,
    guards: Vec<Expression<V, bool>>,
}

/// Compiles a clause sequence and its final expression into a chain.
///
/// # Errors
///
/// Returns [`DoError::MalformedSequence`] when an expression declares a read
/// of a name that is not visible at its position: not bound by an earlier
/// generator (or, for guards, by the generator they follow) and not
/// captured from the enclosing scope. Structural problems (empty sequence,
/// leading guard, duplicate names) are already rejected when the sequence is
/// built.
pub fn compile<V: Value>(
    sequence: ClauseSequence<V>,
    final_expr: Expression<V>,
) -> Result<CompiledChain<V>, DoError> {
    let (clauses, environment) = sequence.into_parts();
    let final_clause = clauses.len();

    let mut groups: Vec<Group<V>> = Vec::new();
    let mut bound: FxHashSet<Name> = FxHashSet::default();
    let mut bindings = Bindings::default();
    let mut guards = 0;

    for (index, clause) in clauses.into_iter().enumerate() {
        match clause {
            Clause::Generator { pattern, source } => {
                check_reads(source.reads(), index, &bound, &environment)?;
                let depth = groups.len();
                for name in pattern.names() {
                    bindings.record(name.clone(), depth);
                    bound.insert(name);
                }
                groups.push(Group {
                    pattern,
                    source,
                    guards: Vec::new(),
                });
            }
            Clause::Guard { predicate } => {
                check_reads(predicate.reads(), index, &bound, &environment)?;
                let group = groups.last_mut().ok_or(MalformedReason::LeadingGuard)?;
                group.guards.push(predicate);
                guards += 1;
            }
        }
    }
    check_reads(final_expr.reads(), final_clause, &bound, &environment)?;

    let generators = groups.len();
    let mut free = NameSet::new();
    free.extend(final_expr.reads());
    let mut root: Option<Arc<Stage<V>>> = None;

    for (depth, group) in groups.into_iter().enumerate().rev() {
        let Group {
            pattern,
            source,
            guards: predicates,
        } = group;

        for predicate in &predicates {
            free.extend(predicate.reads());
        }
        for name in pattern.names() {
            free.remove(&name);
        }
        let Captures { carried, lexical } = split(&free, depth, &bindings, &environment);

        let mut node = match root.take() {
            Some(next) => Node::FlatMap(FlatMapNode { body: next }),
            None => Node::Map(MapNode {
                body: final_expr.clone(),
            }),
        };
        for (guard, predicate) in predicates.into_iter().enumerate().rev() {
            node = Node::Filter(FilterNode {
                guard,
                predicate,
                continuation: Box::new(node),
            });
        }

        free.extend(source.reads());
        root = Some(Arc::new(Stage {
            depth,
            pattern,
            source,
            carried,
            lexical,
            node,
        }));
    }

    let root = root.ok_or(MalformedReason::Empty)?;
    let entry = environment.project(root.source.reads());

    #[cfg(feature = "tracing")]
    tracing::debug!(generators, guards, entry = entry.len(), "compiled clause sequence");

    Ok(CompiledChain {
        root,
        entry,
        generators,
        guards,
    })
}
