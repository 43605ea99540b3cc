//! nestmock - verify call chains through nesting mocks
//!
//! A nesting mock is a recorded callable whose calls may return further
//! nesting mocks, modeling curried call sequences such as `fetch(1)(2)(3)`.
//! This crate answers one question about such a recording: did any path
//! through the call tree match an expected sequence of argument lists, and if
//! not, which actual paths came closest?
//!
//! # Architecture
//!
//! - [`Value`] — Erased argument/return values; [`Value::Mock`] enables nesting
//! - [`NestingMock`] — Recording of [`Invocation`]s (args + [`Outcome`])
//! - [`Equality`] — Injected deep equality over argument lists ([`DeepEquals`] by default)
//! - [`extract_paths`] — Every actual call path, depth-first, in recording order
//! - [`match_paths`] — Every path consistent with a prefix of the expected sequence
//! - [`to_have_been_nested_called_with`] — Entry point and decision policy
//! - [`MatcherRegistry`] — Name → matcher adapter for host assertion frameworks
//! - [`expect`] — Fluent, panicking assertion surface for tests
//!
//! # Key Invariants
//!
//! 1. **Read-only**: the matcher never mutates a recording; every call is a
//!    pure function of the snapshot it reads.
//!
//! 2. **Fail-open recursion**: a call whose returned mock yields no deeper path
//!    is still reported as a path of its own.
//!
//! 3. **Full match = exact length**: only a matched path as long as the expected
//!    sequence passes. Shorter prefix matches fail with a diagnostic listing the
//!    actual paths, longest first.
//!
//! 4. **Usage errors are not assertion failures**: a non-mock `actual` or a
//!    malformed expected sequence returns [`UsageError`], never `pass: false`.
//!
//! # Example
//!
//! ```
//! use nestmock::prelude::*;
//!
//! let fetch = NestingMock::new();
//! let by_user = fetch.call(args!["users"]).unwrap();
//! by_user.as_mock().unwrap().call(args![42]).unwrap();
//!
//! let result = nested_called_with(&DeepEquals, &fetch, nesting_args![["users"], [42]]).unwrap();
//! assert!(result.pass);
//!
//! let result = nested_called_with(&DeepEquals, &fetch, nesting_args![["users"], [42], [true]]).unwrap();
//! assert_eq!(result.verdict, Verdict::PartialMatch);
//! assert!(result.message().contains(r#"fn("users")(42)"#));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod assertion;
mod equality;
mod expectation;
mod expected;
mod format;
mod mock;
mod paths;
mod registry;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Data model
pub use mock::{ArgList, Behavior, CallPath, Invocation, NestingMock, Outcome};
pub use value::{CustomValue, Value};

// Equality seam
pub use equality::{DeepEquals, Equality};

// Walks
pub use paths::{extract_paths, extract_paths_with_limit, match_paths, match_paths_with_limit};

// Entry point
pub use assertion::{
    nested_called_with, nested_called_with_options, to_have_been_nested_called_with,
    MatchOptions, MatchResult, Verdict,
};
pub use expected::{ExpectedArgs, NestingArgs};
pub use format::print_call;

// Host integration
pub use expectation::{expect, Expectation};
pub use registry::{
    register_nesting_matchers, MatcherFn, MatcherRegistry, RegistryBuilder,
    TO_BE_NESTED_CALLED_WITH, TO_HAVE_BEEN_NESTED_CALLED_WITH,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use nestmock::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        args,
        // Entry points
        expect,
        nested_called_with,
        nesting_args,
        to_have_been_nested_called_with,
        // Data model
        ArgList,
        CallPath,
        DeepEquals,
        Equality,
        ExpectedArgs,
        Invocation,
        MatchOptions,
        MatchResult,
        // Errors
        MatcherError,
        NestingArgs,
        NestingMock,
        Outcome,
        UsageError,
        Value,
        Verdict,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Stack-safety backstop for [`extract_paths`] and [`match_paths`].
///
/// Cycles are detected directly ([`MatcherError::Cycle`]); this only bounds the
/// recursion for acyclic recordings nested deeper than any real call chain.
/// Override per call via [`MatchOptions::max_depth`].
pub const MAX_DEPTH: usize = 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from walking a recording.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    /// A call returned a mock that is one of its own ancestors.
    #[error(
        "call tree is cyclic: the call at depth {depth} returned a mock that is \
         already on its call path"
    )]
    Cycle {
        /// Depth of the call that closed the cycle.
        depth: usize,
    },
    /// The call tree nests deeper than the configured cap.
    #[error("call tree nesting depth reached {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Depth at which the walk stopped.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
}

/// Misuse of the matcher: the test itself is written wrong.
///
/// These are hard failures, distinct from an assertion that did not pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// `actual` is not a nesting mock.
    #[error("actual must be a nesting mock, found {found}")]
    NotANestingMock {
        /// Type name of the value supplied.
        found: &'static str,
    },
    /// The expected argument did not resolve to an ordered sequence.
    #[error("expected args must be a list of argument lists (or {{args: [...]}}), found {found}")]
    ExpectedNotSequence {
        /// Type name of the value supplied.
        found: &'static str,
    },
    /// An element of the expected sequence is not an argument list.
    #[error("expected args[{index}] must be an argument list, found {found}")]
    ArgListNotSequence {
        /// Position in the expected sequence.
        index: usize,
        /// Type name of the element.
        found: &'static str,
    },
    /// No matcher is registered under the requested name.
    #[error("unknown matcher \"{name}\"{}", list_available(.available))]
    UnknownMatcher {
        /// The requested name.
        name: String,
        /// Names that ARE registered.
        available: Vec<String>,
    },
    /// The recording could not be walked.
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

fn list_available(available: &[String]) -> String {
    if available.is_empty() {
        "; no matchers are registered".to_owned()
    } else {
        format!("; registered: {}", available.join(", "))
    }
}
