//! Expected call sequences
//!
//! An expected sequence is one [`ArgList`] per nesting depth. Callers pass it
//! directly or wrapped in [`NestingArgs`]; both resolve to [`ExpectedArgs`].
//! Untyped data (fixtures, CLI input) resolves through `TryFrom<&Value>`, which
//! is where malformed input becomes a [`UsageError`].

use crate::{ArgList, UsageError, Value};

/// Build an [`ArgList`] from heterogeneous values.
///
/// ```
/// use nestmock::{args, Value};
///
/// assert_eq!(args![1, "a"], vec![Value::Int(1), Value::String("a".into())]);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($arg)),+]
    };
}

/// Build a [`NestingArgs`] wrapper, one bracketed group per nesting depth.
///
/// ```
/// use nestmock::{args, nesting_args};
///
/// let expected = nesting_args![[1], ["a", 2], []];
/// assert_eq!(expected.args, vec![args![1], args!["a", 2], args![]]);
/// ```
#[macro_export]
macro_rules! nesting_args {
    ($([$($arg:expr),* $(,)?]),* $(,)?) => {
        $crate::NestingArgs::from_args(::std::vec![$($crate::args![$($arg),*]),*])
    };
}

/// Named wrapper carrying an expected sequence under `args`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestingArgs {
    /// One argument list per nesting depth.
    pub args: Vec<ArgList>,
}

impl NestingArgs {
    /// An empty wrapper; add levels with [`call`](Self::call).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sequence.
    #[must_use]
    pub fn from_args(args: Vec<ArgList>) -> Self {
        Self { args }
    }

    /// Append the argument list expected at the next depth.
    #[must_use]
    pub fn call(mut self, args: ArgList) -> Self {
        self.args.push(args);
        self
    }
}

/// A resolved expected sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpectedArgs(Vec<ArgList>);

impl ExpectedArgs {
    /// The argument lists, outermost first.
    #[must_use]
    pub fn levels(&self) -> &[ArgList] {
        &self.0
    }

    /// Consume into the underlying sequence.
    #[must_use]
    pub fn into_inner(self) -> Vec<ArgList> {
        self.0
    }
}

impl From<Vec<ArgList>> for ExpectedArgs {
    fn from(levels: Vec<ArgList>) -> Self {
        Self(levels)
    }
}

impl From<&[ArgList]> for ExpectedArgs {
    fn from(levels: &[ArgList]) -> Self {
        Self(levels.to_vec())
    }
}

impl From<NestingArgs> for ExpectedArgs {
    fn from(wrapped: NestingArgs) -> Self {
        Self(wrapped.args)
    }
}

impl TryFrom<&Value> for ExpectedArgs {
    type Error = UsageError;

    /// Resolve untyped input.
    ///
    /// A map whose `args` entry is a list is unwrapped transparently. What
    /// remains must be a list of lists.
    fn try_from(value: &Value) -> Result<Self, UsageError> {
        let sequence = match value.as_map().and_then(|map| map.get("args")) {
            Some(args) if args.is_list() => args,
            _ => value,
        };

        let Some(items) = sequence.as_list() else {
            return Err(UsageError::ExpectedNotSequence {
                found: sequence.type_name(),
            });
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::List(args) => Ok(args.clone()),
                other => Err(UsageError::ArgListNotSequence {
                    index,
                    found: other.type_name(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl TryFrom<Value> for ExpectedArgs {
    type Error = UsageError;

    fn try_from(value: Value) -> Result<Self, UsageError> {
        Self::try_from(&value)
    }
}
