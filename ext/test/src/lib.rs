//! nestmock-test: Recording helpers and conformance fixtures
//!
//! Provides small builders for call trees that would otherwise take a line per
//! call, plus (feature = `"fixtures"`) the YAML fixture model and runner used
//! by the conformance suite.
//!
//! # Example
//!
//! ```
//! use nestmock_test::prelude::*;
//!
//! // fn(1)(2) and fn(3)
//! let root = NestingMock::new();
//! record_chain(&root, &[args![1], args![2]]);
//! record_chain(&root, &[args![3]]);
//!
//! assert_eq!(extract_paths(&root).unwrap().len(), 2);
//! ```

use nestmock::{ArgList, NestingMock, Value};

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Record the curried chain `fn(levels[0])(levels[1])...` starting at `root`.
///
/// Returns whatever the last call produced. Stops early (returning the
/// value reached) if a call throws or returns something other than a mock.
pub fn record_chain(root: &NestingMock, levels: &[ArgList]) -> Value {
    let mut current = Value::from(root);
    for args in levels {
        let Some(mock) = current.as_mock() else {
            break;
        };
        current = match mock.call(args.clone()) {
            Ok(value) | Err(value) => value,
        };
        if !current.is_mock() {
            break;
        }
    }
    current
}

/// A fresh nesting mock with the single chain `levels` recorded on it.
#[must_use]
pub fn chain(levels: &[ArgList]) -> NestingMock {
    let root = NestingMock::new();
    record_chain(&root, levels);
    root
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{chain, record_chain};
    pub use nestmock::prelude::*;
    pub use nestmock::{extract_paths, match_paths};
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestmock::{args, extract_paths, nested_called_with, nesting_args, DeepEquals};

    #[test]
    fn test_chain_records_every_level() {
        let root = chain(&[args![1], args!["a"], args![]]);
        assert_eq!(
            extract_paths(&root).unwrap(),
            vec![vec![args![1], args!["a"], args![]]]
        );
    }

    #[test]
    fn test_separate_chains_branch_at_root() {
        let root = NestingMock::new();
        record_chain(&root, &[args![1], args![2]]);
        record_chain(&root, &[args![1], args![3]]);

        // Each chain starts a fresh call at the root, so both are separate branches.
        assert_eq!(root.call_count(), 2);
        let result = nested_called_with(&DeepEquals, &root, nesting_args![[1], [3]]).unwrap();
        assert!(result.pass);
    }

    #[test]
    fn test_record_chain_stops_at_terminal() {
        let root = NestingMock::with_depth(2);
        let last = record_chain(&root, &[args![1], args![2], args![3]]);

        assert!(last.is_null());
        assert_eq!(extract_paths(&root).unwrap(), vec![vec![args![1], args![2]]]);
    }

    #[test]
    fn test_record_chain_stops_at_throw() {
        let root = NestingMock::throwing("boom");
        let last = record_chain(&root, &[args![1], args![2]]);
        assert_eq!(last, Value::from("boom"));
        assert_eq!(root.call_count(), 1);
    }
}
