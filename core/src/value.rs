//! `Value` — Type-erased argument and return values recorded by nesting mocks
//!
//! Mock recordings hold values of arbitrary type. `Value` erases them into one
//! enum so the extractor and matcher stay non-generic, and deep equality can be
//! supplied as a plain function over `&[Value]`.
//!
//! # Extensibility via `Custom`
//!
//! For domain types not covered by the primitives, implement [`CustomValue`]
//! and wrap in `Value::Custom(Arc::new(your_type))`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::NestingMock;

/// Extension trait for custom argument types.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: recordings are shared handles and
/// may be inspected from any thread once the code under test has returned.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use nestmock::{CustomValue, Value};
///
/// #[derive(Debug, PartialEq)]
/// struct UserId(u64);
///
/// impl CustomValue for UserId {
///     fn custom_type_name(&self) -> &'static str {
///         "user_id"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
///
///     fn eq_custom(&self, other: &dyn CustomValue) -> bool {
///         other.as_any().downcast_ref::<UserId>() == Some(self)
///     }
/// }
///
/// let a = Value::Custom(Arc::new(UserId(7)));
/// let b = Value::Custom(Arc::new(UserId(7)));
/// assert_eq!(a, b);
/// assert_eq!(a.type_name(), "user_id");
/// ```
pub trait CustomValue: Send + Sync + Debug {
    /// Returns a human-readable type identifier, e.g. `"user_id"`.
    fn custom_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Structural equality against another custom value.
    ///
    /// Defaults to identity: two values are equal only if they are the same object.
    fn eq_custom(&self, other: &dyn CustomValue) -> bool {
        std::ptr::eq(
            self.as_any() as *const dyn Any as *const (),
            other.as_any() as *const dyn Any as *const (),
        )
    }
}

/// An erased argument, return value, or thrown error.
///
/// A `Mock` value is what makes nesting possible: when a recorded call returned
/// another [`NestingMock`], the extractor and matcher descend into it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of a value (`undefined`/`null`/`()`).
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point. `NaN` equals `NaN` under [`PartialEq`].
    Float(f64),
    /// String.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    List(Vec<Value>),
    /// String-keyed map, ordered by key.
    Map(BTreeMap<String, Value>),
    /// A nested mock returned from a call.
    Mock(NestingMock),
    /// User-defined type implementing [`CustomValue`].
    Custom(Arc<dyn CustomValue>),
}

// Manual PartialEq: floats need NaN handling, mocks compare by identity,
// and trait objects delegate to `eq_custom`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Mock(a), Self::Mock(b)) => a.ptr_eq(b),
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b) || a.eq_custom(b.as_ref()),
            _ => false,
        }
    }
}

impl Value {
    /// Build a `Bytes` value.
    #[must_use]
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Build a `Map` value from key-value pairs.
    #[must_use]
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns `true` if this is the `Null` variant.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if this is a nested mock.
    #[inline]
    #[must_use]
    pub fn is_mock(&self) -> bool {
        matches!(self, Self::Mock(_))
    }

    /// Returns `true` if this is a list.
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Try to get the value as a nesting mock.
    ///
    /// This is the capability check at the untyped boundary: anything that is
    /// not a `Mock` cannot be walked.
    #[inline]
    #[must_use]
    pub fn as_mock(&self) -> Option<&NestingMock> {
        match self {
            Self::Mock(m) => Some(m),
            _ => None,
        }
    }

    /// Try to get the value as a list slice.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Try to get the value as a map.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Try to get the value as a custom value reference.
    #[inline]
    #[must_use]
    pub fn as_custom(&self) -> Option<&dyn CustomValue> {
        match self {
            Self::Custom(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// Used in usage-error messages. For `Custom` variants, this delegates to
    /// [`CustomValue::custom_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Mock(_) => "nesting_mock",
            Self::Custom(c) => c.custom_type_name(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "b{b:?}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
            Self::Mock(_) => f.write_str("[nesting mock]"),
            Self::Custom(c) => write!(f, "{c:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<NestingMock> for Value {
    fn from(mock: NestingMock) -> Self {
        Self::Mock(mock)
    }
}

impl From<&NestingMock> for Value {
    fn from(mock: &NestingMock) -> Self {
        Self::Mock(mock.clone())
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
