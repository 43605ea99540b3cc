//! `NestingMock` — A recorded callable whose calls may return further mocks
//!
//! Each invocation is recorded together with its [`Outcome`]. When the outcome
//! is a returned [`Value::Mock`], the recording forms a tree: `fn(1)(2)(3)` is
//! three invocations on three mocks, each one returned by its parent.
//!
//! The matcher never mutates a recording. It reads one level at a time under a
//! short-lived lock, cloning only the argument lists it keeps and the handles of
//! returned mocks. The lock is released before descending, so a mock that
//! returns itself cannot deadlock the walk (it is reported as a cycle instead).

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::Value;

/// The arguments of a single invocation.
pub type ArgList = Vec<Value>;

/// One traversal from the root mock down through successive returned mocks:
/// one [`ArgList`] per nesting depth.
pub type CallPath = Vec<ArgList>;

/// How a recorded invocation finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The call returned normally. The value may itself be a nesting mock.
    Returned(Value),
    /// The call threw.
    Threw(Value),
}

impl Outcome {
    /// The nested mock this call returned, if any.
    ///
    /// Thrown failures and non-mock return values terminate a call path.
    #[must_use]
    pub fn nested_mock(&self) -> Option<&NestingMock> {
        match self {
            Self::Returned(value) => value.as_mock(),
            Self::Threw(_) => None,
        }
    }

    /// Returns `true` if the call threw.
    #[must_use]
    pub fn is_throw(&self) -> bool {
        matches!(self, Self::Threw(_))
    }
}

/// A single recorded call: the arguments and what happened.
///
/// Pairing both in one struct keeps `calls[i]` and `results[i]` in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Arguments supplied to the call.
    pub args: ArgList,
    /// Recorded outcome of the call.
    pub outcome: Outcome,
}

impl Invocation {
    /// Create an invocation that returned `value`.
    pub fn returned(args: ArgList, value: impl Into<Value>) -> Self {
        Self {
            args,
            outcome: Outcome::Returned(value.into()),
        }
    }

    /// Create an invocation that threw `error`.
    pub fn threw(args: ArgList, error: impl Into<Value>) -> Self {
        Self {
            args,
            outcome: Outcome::Threw(error.into()),
        }
    }
}

/// What a [`NestingMock`] does when called.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Every call returns a fresh child mock, without limit.
    Nest,
    /// Calls return child mocks for this many more levels, then `Null`.
    NestLevels(usize),
    /// Every call returns this value.
    Return(Value),
    /// Every call throws this value.
    Throw(Value),
}

impl Behavior {
    fn child(&self) -> Self {
        match self {
            Self::NestLevels(levels) if *levels > 1 => Self::NestLevels(levels - 1),
            Self::NestLevels(_) => Self::Return(Value::Null),
            other => other.clone(),
        }
    }
}

/// One recorded call as the path walks see it.
pub(crate) struct Branch {
    pub(crate) args: ArgList,
    /// The mock this call returned, if it returned one.
    pub(crate) nested: Option<NestingMock>,
}

struct Inner {
    behavior: Behavior,
    call_path: CallPath,
    invocations: Mutex<Vec<Invocation>>,
}

/// A callable stand-in that records its invocations.
///
/// `NestingMock` is a shared handle: clones observe the same recording.
///
/// # Example
///
/// ```
/// use nestmock::{args, NestingMock};
///
/// let fetch = NestingMock::new();
/// let next = fetch.call(args![1]).unwrap();
/// next.as_mock().unwrap().call(args![2]).unwrap();
///
/// assert_eq!(fetch.call_count(), 1);
/// assert_eq!(next.as_mock().unwrap().call_path(), &[args![1]]);
/// ```
#[derive(Clone)]
pub struct NestingMock {
    inner: Arc<Inner>,
}

impl NestingMock {
    /// A mock whose every call returns another nesting mock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Nest)
    }

    /// A mock that nests `depth` levels deep: the call at the last level returns `Null`.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        if depth <= 1 {
            Self::returning(Value::Null)
        } else {
            Self::with_behavior(Behavior::NestLevels(depth - 1))
        }
    }

    /// A terminal mock whose calls return `value`.
    #[must_use]
    pub fn returning(value: impl Into<Value>) -> Self {
        Self::with_behavior(Behavior::Return(value.into()))
    }

    /// A terminal mock whose calls throw `error`.
    #[must_use]
    pub fn throwing(error: impl Into<Value>) -> Self {
        Self::with_behavior(Behavior::Throw(error.into()))
    }

    /// A mock with an explicit behavior.
    #[must_use]
    pub fn with_behavior(behavior: Behavior) -> Self {
        Self::build(behavior, Vec::new(), Vec::new())
    }

    /// A mock built directly from a recording, e.g. one deserialized from a fixture.
    ///
    /// Further calls on it return `Null`.
    #[must_use]
    pub fn from_invocations(invocations: Vec<Invocation>) -> Self {
        Self::build(Behavior::Return(Value::Null), Vec::new(), invocations)
    }

    fn build(behavior: Behavior, call_path: CallPath, invocations: Vec<Invocation>) -> Self {
        Self {
            inner: Arc::new(Inner {
                behavior,
                call_path,
                invocations: Mutex::new(invocations),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Invocation>> {
        // Append-only: a panic mid-push leaves nothing half-written worth discarding.
        self.inner
            .invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Invoke the mock, recording the call.
    ///
    /// Returns `Ok` with the returned value (possibly a child mock) or `Err`
    /// with the thrown value.
    pub fn call(&self, args: ArgList) -> Result<Value, Value> {
        let outcome = match &self.inner.behavior {
            Behavior::Nest | Behavior::NestLevels(_) => {
                let mut call_path = self.inner.call_path.clone();
                call_path.push(args.clone());
                let child = Self::build(self.inner.behavior.child(), call_path, Vec::new());
                Outcome::Returned(Value::Mock(child))
            }
            Behavior::Return(value) => Outcome::Returned(value.clone()),
            Behavior::Throw(error) => Outcome::Threw(error.clone()),
        };

        self.lock().push(Invocation {
            args,
            outcome: outcome.clone(),
        });

        match outcome {
            Outcome::Returned(value) => Ok(value),
            Outcome::Threw(error) => Err(error),
        }
    }

    /// Append a pre-built invocation to the recording.
    pub fn record(&self, args: ArgList, outcome: Outcome) {
        self.lock().push(Invocation { args, outcome });
    }

    /// Recorded calls whose arguments pass `keep`, in call order.
    ///
    /// `keep` runs under the recording lock and must not call back into this
    /// mock. Only kept argument lists and returned mock handles are cloned.
    pub(crate) fn branches(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Vec<Branch> {
        self.lock()
            .iter()
            .filter(|inv| keep(&inv.args))
            .map(|inv| Branch {
                args: inv.args.clone(),
                nested: inv.outcome.nested_mock().cloned(),
            })
            .collect()
    }

    /// Snapshot of the recorded invocations, in call order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.lock().clone()
    }

    /// Arguments of every recorded call, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<ArgList> {
        self.lock().iter().map(|inv| inv.args.clone()).collect()
    }

    /// Outcome of every recorded call, index-aligned with [`calls`](Self::calls).
    #[must_use]
    pub fn results(&self) -> Vec<Outcome> {
        self.lock().iter().map(|inv| inv.outcome.clone()).collect()
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().len()
    }

    /// The argument lists that produced this mock from its root.
    ///
    /// Empty for a root mock.
    #[must_use]
    pub fn call_path(&self) -> &[ArgList] {
        &self.inner.call_path
    }

    /// Returns `true` if both handles refer to the same mock.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for NestingMock {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for NestingMock {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// Recordings can be large and self-referential; print the shape only.
impl fmt::Debug for NestingMock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestingMock")
            .field("call_path", &self.inner.call_path)
            .field("calls", &self.call_count())
            .finish()
    }
}
