//! Free-variable analysis for compiled stages.
//!
//! Each generator's body closure must hold exactly the names its subtree
//! reads from outside: names bound by earlier generators are carried at run
//! time, names from the enclosing scope are copied in at compile time.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::clause::{Environment, Name};
use crate::error::{DoError, MalformedReason};
use crate::value::Value;

/// An insertion-ordered set of names.
///
/// Order keeps compiled stages deterministic, which makes `Display` output
/// and captured scopes stable across compilations.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameSet {
    order: Vec<Name>,
    seen: FxHashSet<Name>,
}

impl NameSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &Name) {
        if self.seen.insert(name.clone()) {
            self.order.push(name.clone());
        }
    }

    pub(crate) fn extend<'a>(&mut self, names: impl IntoIterator<Item = &'a Name>) {
        for name in names {
            self.insert(name);
        }
    }

    pub(crate) fn remove(&mut self, name: &Name) {
        if self.seen.remove(name) {
            self.order.retain(|kept| kept != name);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Name> {
        self.order.iter()
    }
}

/// Where each generator-bound name is introduced.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    depth_of: FxHashMap<Name, usize>,
}

impl Bindings {
    pub(crate) fn record(&mut self, name: Name, depth: usize) {
        self.depth_of.insert(name, depth);
    }

    /// Returns `true` if `name` is bound by a generator before `depth`.
    pub(crate) fn bound_before(&self, name: &Name, depth: usize) -> bool {
        self.depth_of
            .get(name)
            .is_some_and(|bound_at| *bound_at < depth)
    }
}

/// The outside names a stage's body closure holds.
pub(crate) struct Captures<V> {
    /// Names bound by earlier generators, copied from the scope at run time.
    pub(crate) carried: Vec<Name>,
    /// Names from the enclosing scope, copied when the chain is compiled.
    pub(crate) lexical: Environment<V>,
}

/// Splits the free names of stage `depth` into carried and lexical captures.
pub(crate) fn split<V: Value>(
    free: &NameSet,
    depth: usize,
    bindings: &Bindings,
    environment: &Environment<V>,
) -> Captures<V> {
    let mut carried = Vec::new();
    let mut lexical = Environment::new();
    for name in free.iter() {
        if bindings.bound_before(name, depth) {
            carried.push(name.clone());
        } else if let Some(value) = environment.get(name.as_str()) {
            lexical.insert(name.clone(), value.clone());
        }
    }
    Captures { carried, lexical }
}

/// Checks that every name in `reads` is visible at `clause`.
///
/// A name is visible if an earlier generator bound it (`bound`) or the
/// enclosing scope provides it.
pub(crate) fn check_reads<V>(
    reads: &[Name],
    clause: usize,
    bound: &FxHashSet<Name>,
    environment: &Environment<V>,
) -> Result<(), DoError> {
    match reads
        .iter()
        .find(|name| !bound.contains(*name) && !environment.contains(name.as_str()))
    {
        Some(name) => Err(MalformedReason::UnboundName {
            name: name.clone(),
            clause,
        }
        .into()),
        None => Ok(()),
    }
}
