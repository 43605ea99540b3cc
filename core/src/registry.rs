//! Matcher registry — the adapter between nestmock and a host assertion framework.
//!
//! Host frameworks extend their `expect` surface with a name → matcher map.
//! [`RegistryBuilder`] assembles that map, [`register_nesting_matchers`] adds
//! this crate's matcher under both of its names, and [`MatcherRegistry`]
//! dispatches by name. The core walk and decision logic never depend on
//! registration; they are callable directly.
//!
//! # Example
//!
//! ```
//! use nestmock::{args, register_nesting_matchers, DeepEquals, NestingMock, RegistryBuilder, Value};
//!
//! let registry = register_nesting_matchers(RegistryBuilder::new()).build();
//!
//! let fetch = NestingMock::new();
//! fetch.call(args![1]).unwrap();
//!
//! let expected = Value::from(vec![Value::from(vec![1])]);
//! let result = registry
//!     .evaluate("toBeNestedCalledWith", &DeepEquals, &fetch.into(), &expected)
//!     .unwrap();
//! assert!(result.pass);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::{to_have_been_nested_called_with, Equality, MatchResult, UsageError, Value};

/// Primary registered name.
pub const TO_HAVE_BEEN_NESTED_CALLED_WITH: &str = "toHaveBeenNestedCalledWith";

/// Alias registered to the identical implementation.
pub const TO_BE_NESTED_CALLED_WITH: &str = "toBeNestedCalledWith";

/// A registered matcher: `(equals, actual, expected) -> result`.
pub type MatcherFn = fn(&dyn Equality, &Value, &Value) -> Result<MatchResult, UsageError>;

/// Builder for [`MatcherRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    matchers: HashMap<String, MatcherFn>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a matcher under `name`. Registering a name again replaces it.
    #[must_use]
    pub fn matcher(mut self, name: &str, matcher: MatcherFn) -> Self {
        self.matchers.insert(name.to_owned(), matcher);
        self
    }

    /// Freeze the registry. No further registration is possible.
    #[must_use]
    pub fn build(self) -> MatcherRegistry {
        MatcherRegistry {
            matchers: self.matchers,
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("matchers", &self.matchers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Register the nesting matcher under both of its names.
#[must_use]
pub fn register_nesting_matchers(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .matcher(TO_HAVE_BEEN_NESTED_CALLED_WITH, nesting_matcher)
        .matcher(TO_BE_NESTED_CALLED_WITH, nesting_matcher)
}

fn nesting_matcher(
    equals: &dyn Equality,
    actual: &Value,
    expected: &Value,
) -> Result<MatchResult, UsageError> {
    to_have_been_nested_called_with(equals, actual, expected)
}

/// Immutable name → matcher map.
pub struct MatcherRegistry {
    matchers: HashMap<String, MatcherFn>,
}

impl MatcherRegistry {
    /// Look up a matcher by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<MatcherFn> {
        self.matchers.get(name).copied()
    }

    /// Run the matcher registered under `name`.
    ///
    /// # Errors
    ///
    /// - [`UsageError::UnknownMatcher`] if nothing is registered under `name`.
    /// - Whatever usage error the matcher itself raises.
    pub fn evaluate(
        &self,
        name: &str,
        equals: &dyn Equality,
        actual: &Value,
        expected: &Value,
    ) -> Result<MatchResult, UsageError> {
        let matcher = self.get(name).ok_or_else(|| UsageError::UnknownMatcher {
            name: name.to_owned(),
            available: self.names().into_iter().map(str::to_owned).collect(),
        })?;
        matcher(equals, actual, expected)
    }

    /// Returns `true` if a matcher is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.matchers.contains_key(name)
    }

    /// Returns all registered names (sorted).
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatcherRegistry")
            .field("names", &self.names())
            .finish()
    }
}
