//! Rendering call paths for diagnostics.

use crate::ArgList;

/// Render a call path as a curried call, e.g. `fn(1, "a")(2)`.
///
/// The empty path renders as `fn()`.
///
/// ```
/// use nestmock::{args, print_call};
///
/// assert_eq!(print_call(&[args![1, "a"], args![2]]), r#"fn(1, "a")(2)"#);
/// assert_eq!(print_call(&[args![1], args![]]), "fn(1)()");
/// ```
#[must_use]
pub fn print_call(path: &[ArgList]) -> String {
    let levels: Vec<String> = path
        .iter()
        .map(|args| {
            args.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    format!("fn({})", levels.join(")("))
}
