//! Matcher entry point — `toHaveBeenNestedCalledWith`
//!
//! Validates inputs, walks the recording twice (all actual paths for the
//! diagnostic, expected-prefix matches for the decision), and applies the
//! decision policy:
//!
//! | Matches | Any match as long as expected? | Verdict | `pass` |
//! |---------|--------------------------------|---------|--------|
//! | none | - | [`Verdict::NoMatch`] | `false` |
//! | some | yes | [`Verdict::FullMatch`] | `true` |
//! | some | no | [`Verdict::PartialMatch`] | `false` |
//!
//! Misuse (actual is not a nesting mock, expected is not a sequence of argument
//! lists) is a [`UsageError`], never a failed assertion.

use std::cmp::Reverse;

use tracing::debug;

use crate::{
    extract_paths_with_limit, match_paths_with_limit, print_call, CallPath, Equality,
    ExpectedArgs, NestingMock, UsageError, Value, MAX_DEPTH,
};

/// Runtime options for the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(default))]
pub struct MatchOptions {
    /// Deepest nesting level walked before giving up with
    /// [`MatcherError::DepthExceeded`](crate::MatcherError::DepthExceeded).
    /// Cycles are reported regardless of this value.
    pub max_depth: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

/// Which row of the decision table produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No recorded path matched even the first expected argument list.
    NoMatch,
    /// A recorded path matched every expected argument list.
    FullMatch,
    /// Recorded paths matched a prefix of the expected sequence, but none reached its end.
    PartialMatch,
}

impl Verdict {
    /// Returns `true` for [`Verdict::FullMatch`].
    #[must_use]
    pub fn passed(self) -> bool {
        matches!(self, Self::FullMatch)
    }
}

/// Outcome of one matcher invocation.
///
/// The diagnostic is built lazily by [`message`](Self::message): it is only
/// needed when the assertion (or its negation) fails.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Whether the expected sequence was fully matched.
    pub pass: bool,
    /// Which decision row applied.
    pub verdict: Verdict,
    /// The expected sequence, resolved.
    pub expected: CallPath,
    /// Every actual call path, in recording order.
    pub calls: Vec<CallPath>,
    /// Every path consistent with a prefix of `expected`.
    pub matches: Vec<CallPath>,
}

impl MatchResult {
    /// Human-readable, multi-line diagnostic.
    ///
    /// For a passing result this describes the negated expectation, for use
    /// under `.not()`.
    ///
    /// A [`Verdict::NoMatch`] with no recorded calls reports `Number of calls: 0`.
    /// When calls were recorded but none matched, the message departs from that
    /// plain count: it reports `Number of matching calls: 0` and lists the
    /// recorded paths, longest first.
    #[must_use]
    pub fn message(&self) -> String {
        let expected = print_call(&self.expected);
        match self.verdict {
            Verdict::FullMatch => format!("Expected calls not to match {expected}"),
            Verdict::NoMatch if self.calls.is_empty() => format!(
                "Expected the nested function to have been called\n\
                 Expected: {expected}\n\
                 Actual: Number of calls: 0"
            ),
            Verdict::NoMatch => format!(
                "Expected the nested function to have been called\n\
                 Expected: {expected}\n\
                 Actual: Number of matching calls: 0\n  {}",
                self.render_calls()
            ),
            Verdict::PartialMatch => format!(
                "Expected calls to match\n\
                 Expected: {expected}\n\
                 Actual:\n  {}",
                self.render_calls()
            ),
        }
    }

    /// Actual paths, longest first. Equal lengths keep recording order.
    #[must_use]
    pub fn calls_by_length(&self) -> Vec<&CallPath> {
        let mut calls: Vec<&CallPath> = self.calls.iter().collect();
        calls.sort_by_key(|path| Reverse(path.len()));
        calls
    }

    /// The longest expected-prefix match, if any. Ties go to the earliest recorded.
    #[must_use]
    pub fn closest_match(&self) -> Option<&CallPath> {
        self.matches
            .iter()
            .enumerate()
            .max_by_key(|(index, path)| (path.len(), Reverse(*index)))
            .map(|(_, path)| path)
    }

    fn render_calls(&self) -> String {
        self.calls_by_length()
            .into_iter()
            .map(|path| print_call(path))
            .collect::<Vec<_>>()
            .join("\n  ")
    }
}

/// Untyped entry point, as registered with the host framework.
///
/// `actual` must be a [`Value::Mock`]; `expected` must be a list of lists, or a
/// map carrying one under `args`.
///
/// # Errors
///
/// - [`UsageError::NotANestingMock`] if `actual` is not a nesting mock.
/// - [`UsageError::ExpectedNotSequence`] / [`UsageError::ArgListNotSequence`] if
///   `expected` does not resolve to a sequence of argument lists.
/// - [`UsageError::Matcher`] if the recording is cyclic or exceeds [`MAX_DEPTH`].
///
/// # Example
///
/// ```
/// use nestmock::{args, to_have_been_nested_called_with, DeepEquals, NestingMock, Value};
///
/// let fetch = NestingMock::new();
/// fetch.call(args![1]).unwrap().as_mock().unwrap().call(args![2]).unwrap();
///
/// let expected = Value::from(vec![Value::from(vec![1]), Value::from(vec![2])]);
/// let result = to_have_been_nested_called_with(&DeepEquals, &fetch.into(), &expected).unwrap();
/// assert!(result.pass);
///
/// let misuse = to_have_been_nested_called_with(&DeepEquals, &Value::from(3), &expected);
/// assert!(misuse.is_err());
/// ```
pub fn to_have_been_nested_called_with<E>(
    equals: &E,
    actual: &Value,
    expected: &Value,
) -> Result<MatchResult, UsageError>
where
    E: Equality + ?Sized,
{
    let mock = require_mock(actual)?;
    let expected = ExpectedArgs::try_from(expected)?;
    nested_called_with(equals, mock, expected)
}

/// Typed entry point with default [`MatchOptions`].
///
/// # Errors
///
/// Returns [`UsageError::Matcher`] if the recording is cyclic or exceeds [`MAX_DEPTH`].
pub fn nested_called_with<E, X>(
    equals: &E,
    mock: &NestingMock,
    expected: X,
) -> Result<MatchResult, UsageError>
where
    E: Equality + ?Sized,
    X: Into<ExpectedArgs>,
{
    nested_called_with_options(equals, mock, expected, &MatchOptions::default())
}

/// Typed entry point.
///
/// # Errors
///
/// Returns [`UsageError::Matcher`] if the recording is cyclic or exceeds `options.max_depth`.
pub fn nested_called_with_options<E, X>(
    equals: &E,
    mock: &NestingMock,
    expected: X,
    options: &MatchOptions,
) -> Result<MatchResult, UsageError>
where
    E: Equality + ?Sized,
    X: Into<ExpectedArgs>,
{
    let expected = expected.into().into_inner();

    let calls = extract_paths_with_limit(mock, options.max_depth)?;
    let matches = match_paths_with_limit(equals, mock, &expected, options.max_depth)?;

    let verdict = if matches.is_empty() {
        Verdict::NoMatch
    } else if matches.iter().any(|path| path.len() == expected.len()) {
        Verdict::FullMatch
    } else {
        Verdict::PartialMatch
    };

    debug!(
        expected = expected.len(),
        calls = calls.len(),
        matches = matches.len(),
        ?verdict,
        "nested call assertion evaluated"
    );

    Ok(MatchResult {
        pass: verdict.passed(),
        verdict,
        expected,
        calls,
        matches,
    })
}

pub(crate) fn require_mock(actual: &Value) -> Result<&NestingMock, UsageError> {
    actual.as_mock().ok_or(UsageError::NotANestingMock {
        found: actual.type_name(),
    })
}
