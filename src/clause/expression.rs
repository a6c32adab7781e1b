//! Caller-supplied expressions with declared dependencies.
//!
//! An [`Expression`] is a closure over a [`Scope`] together with the list
//! of names it reads. Declaring reads up front lets the compiler check every
//! reference against the bindings visible at that clause and hand each
//! nested closure exactly the names it needs.
//!
//! # Examples
//!
//! ```rust
//! use bindchain::clause::{Expression, Name, Scope};
//! use bindchain::error::DoError;
//! # use bindchain::capability::CapabilitySet;
//! # use bindchain::value::Value;
//! # #[derive(Debug, Clone, PartialEq)]
//! # struct Number(i64);
//! # impl Value for Number {
//! #     type Error = DoError;
//! #     fn capabilities(&self) -> Option<CapabilitySet<Self>> { None }
//! # }
//!
//! let sum = Expression::new(["left", "right"], |scope: &Scope<Number>| {
//!     let Number(left) = scope.lookup("left")?;
//!     let Number(right) = scope.lookup("right")?;
//!     Ok(Number(left + right))
//! })
//! .labelled("left + right");
//!
//! let mut scope = Scope::new();
//! scope.insert(Name::from("left"), Number(2));
//! scope.insert(Name::from("right"), Number(3));
//! assert_eq!(sum.evaluate(&scope), Ok(Number(5)));
//! assert_eq!(sum.label(), Some("left + right"));
//! ```

use std::fmt;
use std::sync::Arc;

use super::{Name, Scope};
use crate::value::Value;

type Evaluate<V, T> = Arc<dyn Fn(&Scope<V>) -> Result<T, <V as Value>::Error> + Send + Sync>;

/// A closure evaluated in the scope of the names it declares.
///
/// `T` defaults to the value type; guards use `Expression<V, bool>`.
/// Cloning shares the closure.
pub struct Expression<V: Value, T = V> {
    reads: Vec<Name>,
    evaluate: Evaluate<V, T>,
    label: Option<Arc<str>>,
}

impl<V: Value, T: 'static> Expression<V, T> {
    /// Creates an expression that reads `reads` and computes its value
    /// with `function`.
    ///
    /// Every name `function` looks up must appear in `reads`; the closure
    /// only ever sees those names.
    pub fn new<I, N, F>(reads: I, function: F) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        F: Fn(&Scope<V>) -> Result<T, V::Error> + Send + Sync + 'static,
    {
        let mut declared: Vec<Name> = Vec::new();
        for name in reads {
            let name = name.into();
            if !declared.contains(&name) {
                declared.push(name);
            }
        }
        Self {
            reads: declared,
            evaluate: Arc::new(function),
            label: None,
        }
    }

    /// Attaches a human-readable label, used when a chain is displayed.
    #[must_use]
    pub fn labelled(mut self, label: impl Into<Arc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The names this expression reads.
    #[must_use]
    pub fn reads(&self) -> &[Name] {
        &self.reads
    }

    /// The label, if one was attached.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Evaluates the expression.
    ///
    /// # Errors
    ///
    /// Returns whatever error the closure produces, unchanged.
    pub fn evaluate(&self, scope: &Scope<V>) -> Result<T, V::Error> {
        (self.evaluate)(scope)
    }
}

impl<V: Value> Expression<V> {
    /// An expression that reads nothing and yields a clone of `value`.
    pub fn constant(value: V) -> Self {
        Self::new(std::iter::empty::<Name>(), move |_| Ok(value.clone()))
    }

    /// An expression that yields the value bound to `name`.
    pub fn name(name: impl Into<Name>) -> Self {
        let name = name.into();
        let label = Arc::<str>::from(name.as_str());
        let target = name.clone();
        Self::new([name], move |scope| Ok(scope.lookup(target.as_str())?.clone()))
            .labelled(label)
    }
}

impl<V: Value, T> Clone for Expression<V, T> {
    fn clone(&self) -> Self {
        Self {
            reads: self.reads.clone(),
            evaluate: Arc::clone(&self.evaluate),
            label: self.label.clone(),
        }
    }
}

impl<V: Value, T> fmt::Debug for Expression<V, T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Expression")
            .field("reads", &self.reads)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilitySet;
    use crate::error::DoError;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq)]
    struct Number(i64);

    impl Value for Number {
        type Error = DoError;

        fn capabilities(&self) -> Option<CapabilitySet<Self>> {
            None
        }
    }

    #[rstest]
    fn test_reads_are_deduplicated() {
        let expression: Expression<Number> =
            Expression::new(["a", "b", "a"], |_| Ok(Number(0)));
        assert_eq!(expression.reads(), &[Name::from("a"), Name::from("b")]);
    }

    #[rstest]
    fn test_constant_reads_nothing() {
        let expression = Expression::constant(Number(9));
        assert!(expression.reads().is_empty());
        assert_eq!(expression.evaluate(&Scope::new()), Ok(Number(9)));
        assert_eq!(expression.evaluate(&Scope::new()), Ok(Number(9)));
    }

    #[rstest]
    fn test_name_looks_up_binding() {
        let expression = Expression::name("x");
        let mut scope = Scope::new();
        scope.insert(Name::from("x"), Number(3));
        assert_eq!(expression.evaluate(&scope), Ok(Number(3)));
        assert_eq!(expression.label(), Some("x"));
        assert_eq!(
            expression.evaluate(&Scope::new()),
            Err(DoError::UnboundName(Name::from("x")))
        );
    }

    #[rstest]
    fn test_predicate_expression() {
        let positive: Expression<Number, bool> = Expression::new(["n"], |scope| {
            let Number(n) = scope.lookup("n")?;
            Ok(*n > 0)
        });
        let mut scope = Scope::new();
        scope.insert(Name::from("n"), Number(-1));
        assert_eq!(positive.evaluate(&scope), Ok(false));
    }

    #[rstest]
    fn test_clone_shares_closure() {
        let expression = Expression::constant(Number(1)).labelled("one");
        let cloned = expression.clone();
        assert_eq!(cloned.label(), Some("one"));
        assert_eq!(cloned.evaluate(&Scope::new()), Ok(Number(1)));
        assert!(format!("{expression:?}").contains("one"));
    }
}
