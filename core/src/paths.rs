//! Call-path extraction and expected-prefix matching
//!
//! Both walks visit the same structure: the invocations of a mock, then the
//! invocations of every mock those invocations returned, depth-first and in
//! recording order.
//!
//! - [`extract_paths`] keeps every call and yields every actual path.
//! - [`match_paths`] prunes each level to the calls whose arguments equal the
//!   expected argument list at that depth, and yields every path consistent with
//!   the expected prefix, however far it could be followed.
//!
//! # INV: Recursion fails open
//!
//! When a call returned a nested mock but descending into it produced no path
//! (the nested mock was never called, or nothing at the next depth matched),
//! the call's own path is emitted instead of being dropped.
//!
//! # Malformed recordings
//!
//! Real recordings are acyclic, but a hand-built one may contain a mock that
//! returns itself or an ancestor. Each walk tracks the mocks on the current path
//! and returns [`MatcherError::Cycle`] before descending into one of them. A
//! mock shared by sibling branches is not a cycle. Depth is otherwise bounded
//! only by [`MAX_DEPTH`], a stack-safety backstop far beyond real call chains.

use tracing::{debug, trace};

use crate::{ArgList, CallPath, Equality, MatcherError, NestingMock, MAX_DEPTH};

/// The mocks on the path from the root to the level being walked.
type Ancestors = Vec<NestingMock>;

/// Every actual call path recorded under `mock`.
///
/// An untouched mock yields an empty list.
///
/// # Errors
///
/// - [`MatcherError::Cycle`] if a call returned a mock already on its call path.
/// - [`MatcherError::DepthExceeded`] if the recording nests deeper than [`MAX_DEPTH`].
///
/// # Example
///
/// ```
/// use nestmock::{args, extract_paths, NestingMock};
///
/// let fetch = NestingMock::new();
/// let next = fetch.call(args![1]).unwrap();
/// next.as_mock().unwrap().call(args![2]).unwrap();
/// fetch.call(args![3]).unwrap();
///
/// let paths = extract_paths(&fetch).unwrap();
/// assert_eq!(paths, vec![vec![args![1], args![2]], vec![args![3]]]);
/// ```
pub fn extract_paths(mock: &NestingMock) -> Result<Vec<CallPath>, MatcherError> {
    extract_paths_with_limit(mock, MAX_DEPTH)
}

/// [`extract_paths`] with a caller-chosen depth cap.
///
/// # Errors
///
/// As [`extract_paths`], with `max_depth` in place of [`MAX_DEPTH`].
pub fn extract_paths_with_limit(
    mock: &NestingMock,
    max_depth: usize,
) -> Result<Vec<CallPath>, MatcherError> {
    let mut paths = Vec::new();
    walk_calls(mock, &mut Vec::new(), &mut Vec::new(), max_depth, &mut paths)?;
    Ok(paths)
}

fn walk_calls(
    mock: &NestingMock,
    prefix: &mut CallPath,
    ancestors: &mut Ancestors,
    max_depth: usize,
    out: &mut Vec<CallPath>,
) -> Result<(), MatcherError> {
    let branches = mock.branches(|_| true);
    debug!(depth = prefix.len() + 1, calls = branches.len(), "extracting call paths");

    ancestors.push(mock.clone());
    for branch in branches {
        check_depth(prefix, max_depth)?;
        prefix.push(branch.args);

        let before = out.len();
        if let Some(nested) = &branch.nested {
            check_cycle(nested, ancestors, prefix.len())?;
            walk_calls(nested, prefix, ancestors, max_depth, out)?;
        }
        if out.len() == before {
            out.push(prefix.clone());
        }

        prefix.pop();
    }
    ancestors.pop();

    Ok(())
}

/// Every path under `mock` whose arguments match a prefix of `expected`.
///
/// At depth `i` only calls whose arguments equal `expected[i]` (per `equals`)
/// survive. A surviving path stops growing when `expected` is exhausted or when
/// its call did not return a nested mock, so results may be shorter than
/// `expected`. Empty `expected` yields an empty list.
///
/// # Errors
///
/// - [`MatcherError::Cycle`] if a matching call returned a mock already on its call path.
/// - [`MatcherError::DepthExceeded`] if a matching path nests deeper than [`MAX_DEPTH`].
///
/// # Example
///
/// ```
/// use nestmock::{args, match_paths, DeepEquals, NestingMock};
///
/// let fetch = NestingMock::new();
/// fetch.call(args![1]).unwrap().as_mock().unwrap().call(args![2]).unwrap();
///
/// // Only reached fn(1)(2) of the expected fn(1)(2)(3): a partial match.
/// let matches = match_paths(&DeepEquals, &fetch, &[args![1], args![2], args![3]]).unwrap();
/// assert_eq!(matches, vec![vec![args![1], args![2]]]);
/// ```
pub fn match_paths<E>(
    equals: &E,
    mock: &NestingMock,
    expected: &[ArgList],
) -> Result<Vec<CallPath>, MatcherError>
where
    E: Equality + ?Sized,
{
    match_paths_with_limit(equals, mock, expected, MAX_DEPTH)
}

/// [`match_paths`] with a caller-chosen depth cap.
///
/// # Errors
///
/// As [`match_paths`], with `max_depth` in place of [`MAX_DEPTH`].
pub fn match_paths_with_limit<E>(
    equals: &E,
    mock: &NestingMock,
    expected: &[ArgList],
    max_depth: usize,
) -> Result<Vec<CallPath>, MatcherError>
where
    E: Equality + ?Sized,
{
    let mut paths = Vec::new();
    walk_matches(
        equals,
        mock,
        expected,
        &mut Vec::new(),
        &mut Vec::new(),
        max_depth,
        &mut paths,
    )?;
    Ok(paths)
}

fn walk_matches<E>(
    equals: &E,
    mock: &NestingMock,
    expected: &[ArgList],
    prefix: &mut CallPath,
    ancestors: &mut Ancestors,
    max_depth: usize,
    out: &mut Vec<CallPath>,
) -> Result<(), MatcherError>
where
    E: Equality + ?Sized,
{
    let Some((current, rest)) = expected.split_first() else {
        return Ok(());
    };

    let depth = prefix.len() + 1;
    let branches = mock.branches(|args| {
        let keep = equals.equals(args, current);
        if !keep {
            trace!(depth, "call arguments differ, pruned");
        }
        keep
    });
    debug!(depth, matching = branches.len(), "matching call paths");

    ancestors.push(mock.clone());
    for branch in branches {
        check_depth(prefix, max_depth)?;
        prefix.push(branch.args);

        let before = out.len();
        if !rest.is_empty() {
            if let Some(nested) = &branch.nested {
                check_cycle(nested, ancestors, prefix.len())?;
                walk_matches(equals, nested, rest, prefix, ancestors, max_depth, out)?;
            }
        }
        if out.len() == before {
            out.push(prefix.clone());
        }

        prefix.pop();
    }
    ancestors.pop();

    Ok(())
}

fn check_depth(prefix: &CallPath, max_depth: usize) -> Result<(), MatcherError> {
    if prefix.len() >= max_depth {
        return Err(MatcherError::DepthExceeded {
            depth: prefix.len() + 1,
            max: max_depth,
        });
    }
    Ok(())
}

fn check_cycle(
    nested: &NestingMock,
    ancestors: &[NestingMock],
    depth: usize,
) -> Result<(), MatcherError> {
    if ancestors.iter().any(|ancestor| ancestor.ptr_eq(nested)) {
        debug!(depth, "cyclic call tree");
        return Err(MatcherError::Cycle { depth });
    }
    Ok(())
}
