//! `Equality` — Injected deep equality between argument lists
//!
//! The matcher never decides on its own whether two argument lists are equal.
//! The host assertion framework supplies that capability, and it is threaded
//! explicitly through every recursive call. Any
//! `Fn(&[Value], &[Value]) -> bool` closure works; [`DeepEquals`] is the
//! structural default.

use crate::Value;

/// Compares a recorded argument list against an expected one.
///
/// # Example
///
/// ```
/// use nestmock::{args, DeepEquals, Equality, Value};
///
/// assert!(DeepEquals.equals(&args![1, "a"], &args![1, "a"]));
///
/// // Loose equality: ints and floats with the same numeric value are equal.
/// let loose = |a: &[Value], b: &[Value]| {
///     a.len() == b.len()
///         && a.iter().zip(b).all(|(x, y)| match (x, y) {
///             (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => *i as f64 == *f,
///             _ => x == y,
///         })
/// };
/// assert!(loose.equals(&args![1], &args![1.0]));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Equality`",
    label = "this type cannot compare argument lists",
    note = "use `DeepEquals` or a closure `|actual: &[Value], expected: &[Value]| -> bool`"
)]
pub trait Equality: Send + Sync {
    /// Returns `true` if the recorded `actual` arguments equal `expected`.
    fn equals(&self, actual: &[Value], expected: &[Value]) -> bool;
}

impl<F> Equality for F
where
    F: Fn(&[Value], &[Value]) -> bool + Send + Sync,
{
    fn equals(&self, actual: &[Value], expected: &[Value]) -> bool {
        self(actual, expected)
    }
}

/// Structural deep equality.
///
/// Lists and maps compare element-wise, `NaN` equals `NaN`, nested mocks compare
/// by identity, and custom values delegate to [`CustomValue::eq_custom`](crate::CustomValue::eq_custom).
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepEquals;

impl Equality for DeepEquals {
    fn equals(&self, actual: &[Value], expected: &[Value]) -> bool {
        actual == expected
    }
}
