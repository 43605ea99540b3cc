//! Fluent assertion surface for test authors.
//!
//! ```
//! use nestmock::{args, expect, nesting_args, NestingMock};
//!
//! let fetch = NestingMock::new();
//! fetch.call(args![1]).unwrap().as_mock().unwrap().call(args![2]).unwrap();
//!
//! expect(&fetch).to_have_been_nested_called_with(vec![args![1], args![2]]);
//! expect(&fetch).to_be_nested_called_with(nesting_args![[1], [2]]);
//! expect(&fetch).not().to_have_been_nested_called_with(nesting_args![[1], [2], [3]]);
//! ```
//!
//! Assertion failures panic with the diagnostic; so does misuse, with the
//! usage error. The `try_` variants return the raw [`MatchResult`] instead.

use crate::assertion::require_mock;
use crate::{
    nested_called_with_options, DeepEquals, Equality, ExpectedArgs, MatchOptions, MatchResult,
    UsageError, Value,
};

/// Start an assertion about `actual`, compared with [`DeepEquals`].
pub fn expect(actual: impl Into<Value>) -> Expectation {
    Expectation {
        actual: actual.into(),
        negated: false,
        equality: DeepEquals,
        options: MatchOptions::default(),
    }
}

/// A pending assertion about one value.
#[derive(Debug, Clone)]
pub struct Expectation<E = DeepEquals> {
    actual: Value,
    negated: bool,
    equality: E,
    options: MatchOptions,
}

impl<E: Equality> Expectation<E> {
    /// Negate the assertion.
    #[must_use]
    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Compare argument lists with `equality` instead of [`DeepEquals`].
    #[must_use]
    pub fn with_equality<F: Equality>(self, equality: F) -> Expectation<F> {
        Expectation {
            actual: self.actual,
            negated: self.negated,
            equality,
            options: self.options,
        }
    }

    /// Override matcher options such as the depth cap.
    #[must_use]
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the matcher without asserting.
    ///
    /// Negation is not applied: `pass` reports whether the sequence matched.
    ///
    /// # Errors
    ///
    /// Returns a [`UsageError`] if `actual` is not a nesting mock, or if the
    /// recording is cyclic or exceeds the depth cap.
    pub fn try_to_have_been_nested_called_with(
        &self,
        expected: impl Into<ExpectedArgs>,
    ) -> Result<MatchResult, UsageError> {
        let mock = require_mock(&self.actual)?;
        nested_called_with_options(&self.equality, mock, expected, &self.options)
    }

    /// Assert that some recorded call path matches `expected` at every depth.
    ///
    /// # Panics
    ///
    /// Panics with the diagnostic if the assertion (or its negation) fails,
    /// and with the usage error on misuse.
    #[track_caller]
    pub fn to_have_been_nested_called_with(&self, expected: impl Into<ExpectedArgs>) {
        let result = match self.try_to_have_been_nested_called_with(expected) {
            Ok(result) => result,
            Err(e) => panic!("{e}"),
        };
        if result.pass == self.negated {
            panic!("{}", result.message());
        }
    }

    /// Alias of [`to_have_been_nested_called_with`](Self::to_have_been_nested_called_with).
    #[track_caller]
    pub fn to_be_nested_called_with(&self, expected: impl Into<ExpectedArgs>) {
        self.to_have_been_nested_called_with(expected);
    }
}
