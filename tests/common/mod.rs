//! Demo monads shared by the integration tests.
//!
//! `Term` is one dynamic value type covering an Option-like `Just`/`Nothing`,
//! a `List`, a lazy `Reader` and plain integers, strings and tuples that
//! generators bind. Only the monadic variants expose capabilities.

#![allow(dead_code)]

use std::fmt;
use std::sync::Arc;

use bindchain::prelude::*;
use parking_lot::Mutex;

// =============================================================================
// Errors
// =============================================================================

/// The caller-side error type of [`Term`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestError {
    /// Raised by the chain itself.
    Do(DoError),
    /// Raised by a test closure.
    Domain(String),
}

impl From<DoError> for TestError {
    fn from(error: DoError) -> Self {
        Self::Do(error)
    }
}

// =============================================================================
// Reader
// =============================================================================

type Run = Arc<dyn Fn(&Term) -> Result<Term, TestError> + Send + Sync>;

/// A deferred computation over an environment value.
#[derive(Clone)]
pub struct Reader(Run);

impl Reader {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&Term) -> Result<Term, TestError> + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }

    /// The reader returning its environment.
    pub fn ask() -> Self {
        Self::new(|environment| Ok(environment.clone()))
    }

    pub fn run(&self, environment: &Term) -> Result<Term, TestError> {
        (self.0)(environment)
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Reader(<fn>)")
    }
}

impl PartialEq for Reader {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

// =============================================================================
// Term
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Int(i64),
    Text(String),
    Tuple(Vec<Term>),
    Just(Box<Term>),
    Nothing,
    List(Vec<Term>),
    Reader(Reader),
}

impl Term {
    pub fn just(value: Self) -> Self {
        Self::Just(Box::new(value))
    }

    pub fn just_int(value: i64) -> Self {
        Self::just(Self::Int(value))
    }

    pub fn ints(values: &[i64]) -> Self {
        Self::List(values.iter().copied().map(Self::Int).collect())
    }

    pub fn pair(left: Self, right: Self) -> Self {
        Self::Tuple(vec![left, right])
    }

    /// Runs a `Reader` term against `environment`.
    pub fn run_reader(&self, environment: &Self) -> Result<Self, TestError> {
        match self {
            Self::Reader(reader) => reader.run(environment),
            other => Err(TestError::Domain(format!("not a reader: {other:?}"))),
        }
    }
}

impl Value for Term {
    type Error = TestError;

    fn capabilities(&self) -> Option<CapabilitySet<Self>> {
        match self {
            Self::Just(inner) => Some(maybe_capabilities(Some(inner.as_ref().clone()))),
            Self::Nothing => Some(maybe_capabilities(None)),
            Self::List(items) => Some(list_capabilities(items.clone())),
            Self::Reader(reader) => Some(reader_capabilities(reader.clone())),
            Self::Int(_) | Self::Text(_) | Self::Tuple(_) => None,
        }
    }

    fn destructure(&self, arity: usize) -> Option<Vec<Self>> {
        match self {
            Self::Tuple(items) if items.len() == arity => Some(items.clone()),
            _ => None,
        }
    }
}

fn maybe_capabilities(held: Option<Term>) -> CapabilitySet<Term> {
    let mapped = held.clone();
    let bound = held.clone();
    let filtered = held;
    CapabilitySet::new(
        move |body: Body<Term>| match &mapped {
            Some(value) => Ok(Term::just(body(value.clone())?)),
            None => Ok(Term::Nothing),
        },
        move |body: Body<Term>| match &bound {
            Some(value) => body(value.clone()),
            None => Ok(Term::Nothing),
        },
    )
    .with_filter(move |predicate: Predicate<Term>| match &filtered {
        Some(value) if predicate(value)? => Ok(Term::just(value.clone())),
        _ => Ok(Term::Nothing),
    })
}

fn list_capabilities(items: Vec<Term>) -> CapabilitySet<Term> {
    let mapped = items.clone();
    let bound = items.clone();
    let filtered = items;
    CapabilitySet::new(
        move |body: Body<Term>| {
            mapped
                .iter()
                .map(|item| body(item.clone()))
                .collect::<Result<Vec<_>, _>>()
                .map(Term::List)
        },
        move |body: Body<Term>| {
            let mut flattened = Vec::new();
            for item in &bound {
                match body(item.clone())? {
                    Term::List(inner) => flattened.extend(inner),
                    other => {
                        return Err(TestError::Domain(format!(
                            "flatMap body returned a non-list: {other:?}"
                        )));
                    }
                }
            }
            Ok(Term::List(flattened))
        },
    )
    .with_filter(move |predicate: Predicate<Term>| {
        let mut kept = Vec::new();
        for item in &filtered {
            if predicate(item)? {
                kept.push(item.clone());
            }
        }
        Ok(Term::List(kept))
    })
}

/// Reader has no natural failure value, so it exposes no `filter`.
fn reader_capabilities(reader: Reader) -> CapabilitySet<Term> {
    let mapped = reader.clone();
    let bound = reader;
    CapabilitySet::new(
        move |body: Body<Term>| {
            let inner = mapped.clone();
            Ok(Term::Reader(Reader::new(move |environment| {
                body(inner.run(environment)?)
            })))
        },
        move |body: Body<Term>| {
            let inner = bound.clone();
            Ok(Term::Reader(Reader::new(move |environment| {
                body(inner.run(environment)?)?.run_reader(environment)
            })))
        },
    )
}

// =============================================================================
// Expression helpers
// =============================================================================

/// Reads an integer binding.
pub fn int(scope: &Scope<Term>, name: &str) -> Result<i64, TestError> {
    match scope.lookup(name)? {
        Term::Int(value) => Ok(*value),
        other => Err(TestError::Domain(format!("`{name}` is not an integer: {other:?}"))),
    }
}

/// A source that always yields `term`.
pub fn source(term: Term) -> Expression<Term> {
    Expression::constant(term)
}

/// The sum of the integer bindings `names`.
pub fn sum(names: &'static [&'static str]) -> Expression<Term> {
    Expression::new(names.iter().copied(), move |scope| {
        names
            .iter()
            .map(|name| int(scope, name))
            .sum::<Result<i64, _>>()
            .map(Term::Int)
    })
    .labelled(names.join(" + "))
}

/// `name > threshold` over an integer binding.
pub fn greater_than(name: &'static str, threshold: i64) -> Expression<Term, bool> {
    Expression::new([name], move |scope| Ok(int(scope, name)? > threshold))
        .labelled(format!("{name} > {threshold}"))
}

// =============================================================================
// Probes
// =============================================================================

/// Records the order in which labelled closures run.
#[derive(Debug, Default)]
pub struct Probe {
    events: Mutex<Vec<String>>,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|recorded| *recorded == event)
            .count()
    }
}

/// A source that records `label` every time it is evaluated.
pub fn probed(probe: &Arc<Probe>, label: &'static str, term: Term) -> Expression<Term> {
    let probe = Arc::clone(probe);
    Expression::new(std::iter::empty::<Name>(), move |_| {
        probe.record(label);
        Ok(term.clone())
    })
    .labelled(label)
}

/// A source reading `reads` that records `label` every time it is evaluated.
pub fn probed_reading<F>(
    probe: &Arc<Probe>,
    label: &'static str,
    reads: &'static [&'static str],
    function: F,
) -> Expression<Term>
where
    F: Fn(&Scope<Term>) -> Result<Term, TestError> + Send + Sync + 'static,
{
    let probe = Arc::clone(probe);
    Expression::new(reads.iter().copied(), move |scope| {
        probe.record(label);
        function(scope)
    })
    .labelled(label)
}
