//! Conformance test fixture runner
//!
//! Loads YAML fixtures describing a recorded call tree and a list of assertion
//! cases, then runs every case through the registered matcher.
//!
//! ```yaml
//! name: curried fetch
//! description: fn(1)(2) and fn(3)
//! mock:
//!   calls:
//!     - args: [1]
//!       mock:
//!         calls:
//!           - args: [2]
//!     - args: [3]
//!       returns: done
//! cases:
//!   - name: full chain
//!     expect: [[1], [2]]
//!     pass: true
//!     verdict: full_match
//! ```
//!
//! A call with none of `mock`, `returns`, `throws` returned a nested mock that
//! was never called.

use nestmock::{
    register_nesting_matchers, DeepEquals, Invocation, MatchResult, MatcherRegistry,
    NestingMock, RegistryBuilder, UsageError, Value, Verdict, TO_HAVE_BEEN_NESTED_CALLED_WITH,
};
use serde::Deserialize;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub mock: MockConfig,
    pub cases: Vec<TestCase>,
}

/// A recorded nesting mock: its calls in order.
#[derive(Debug, Default, Deserialize)]
pub struct MockConfig {
    #[serde(default)]
    pub calls: Vec<CallConfig>,
}

/// One recorded call. At most one of `mock`, `returns`, `throws` may be set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallConfig {
    #[serde(default)]
    pub args: Vec<serde_json::Value>,
    #[serde(default)]
    pub mock: Option<MockConfig>,
    #[serde(default)]
    pub returns: Option<serde_json::Value>,
    #[serde(default)]
    pub throws: Option<serde_json::Value>,
}

/// Decision row expected for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictConfig {
    NoMatch,
    FullMatch,
    PartialMatch,
}

impl From<VerdictConfig> for Verdict {
    fn from(v: VerdictConfig) -> Self {
        match v {
            VerdictConfig::NoMatch => Verdict::NoMatch,
            VerdictConfig::FullMatch => Verdict::FullMatch,
            VerdictConfig::PartialMatch => Verdict::PartialMatch,
        }
    }
}

/// Test case
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    pub name: String,
    /// Registered matcher name; defaults to `toHaveBeenNestedCalledWith`.
    #[serde(default)]
    pub matcher: Option<String>,
    /// Replaces the fixture's mock as `actual` (for misuse cases).
    #[serde(default)]
    pub actual: Option<serde_json::Value>,
    /// Expected sequence: `[[..], ..]` or `{args: [[..], ..]}`.
    pub expect: serde_json::Value,
    #[serde(default)]
    pub pass: Option<bool>,
    #[serde(default)]
    pub verdict: Option<VerdictConfig>,
    #[serde(default)]
    pub message_contains: Vec<String>,
    /// Substring of the usage error this case must raise.
    #[serde(default)]
    pub usage_error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert config to nestmock types
// ═══════════════════════════════════════════════════════════════════════════════

impl MockConfig {
    /// Build a frozen recording from this config.
    ///
    /// # Errors
    ///
    /// Returns a message naming the call if it sets more than one outcome.
    pub fn build(&self) -> Result<NestingMock, String> {
        let invocations = self
            .calls
            .iter()
            .enumerate()
            .map(|(index, call)| call.build().map_err(|e| format!("calls[{index}]: {e}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NestingMock::from_invocations(invocations))
    }
}

impl CallConfig {
    fn build(&self) -> Result<Invocation, String> {
        let args = self.args.iter().cloned().map(Value::from).collect();

        match (&self.mock, &self.returns, &self.throws) {
            (None, None, None) => Ok(Invocation::returned(args, NestingMock::new())),
            (Some(mock), None, None) => Ok(Invocation::returned(args, mock.build()?)),
            (None, Some(value), None) => Ok(Invocation::returned(args, Value::from(value.clone()))),
            (None, None, Some(error)) => Ok(Invocation::threw(args, Value::from(error.clone()))),
            _ => Err("set at most one of `mock`, `returns`, `throws`".into()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    /// Why the case failed; empty when it passed.
    pub detail: String,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// The registry every fixture runs against.
    #[must_use]
    pub fn registry() -> MatcherRegistry {
        register_nesting_matchers(RegistryBuilder::new()).build()
    }

    /// Run all test cases and return results
    ///
    /// # Errors
    ///
    /// Returns a message if the fixture's mock config is invalid.
    pub fn run(&self) -> Result<Vec<CaseResult>, String> {
        let registry = Self::registry();
        let mock = Value::from(self.mock.build()?);
        Ok(self
            .cases
            .iter()
            .map(|case| case.run(&registry, &mock))
            .collect())
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' is invalid: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {}",
                self.name, result.case_name, result.detail
            );
        }
    }
}

impl TestCase {
    /// Evaluate this case against `mock` (unless it overrides `actual`).
    pub fn evaluate(
        &self,
        registry: &MatcherRegistry,
        mock: &Value,
    ) -> Result<MatchResult, UsageError> {
        let actual = self.actual.clone().map(Value::from);
        let expected = Value::from(self.expect.clone());
        let name = self
            .matcher
            .as_deref()
            .unwrap_or(TO_HAVE_BEEN_NESTED_CALLED_WITH);
        registry.evaluate(name, &DeepEquals, actual.as_ref().unwrap_or(mock), &expected)
    }

    fn run(&self, registry: &MatcherRegistry, mock: &Value) -> CaseResult {
        let detail = match (self.evaluate(registry, mock), &self.usage_error) {
            (Err(e), Some(wanted)) if e.to_string().contains(wanted.as_str()) => None,
            (Err(e), Some(wanted)) => Some(format!("expected usage error containing {wanted:?}, got \"{e}\"")),
            (Err(e), None) => Some(format!("unexpected usage error: {e}")),
            (Ok(result), Some(wanted)) => Some(format!(
                "expected usage error containing {wanted:?}, got pass={}",
                result.pass
            )),
            (Ok(result), None) => self.check(&result),
        };

        CaseResult {
            case_name: self.name.clone(),
            passed: detail.is_none(),
            detail: detail.unwrap_or_default(),
        }
    }

    fn check(&self, result: &MatchResult) -> Option<String> {
        if let Some(pass) = self.pass {
            if result.pass != pass {
                return Some(format!(
                    "expected pass={pass}, got pass={}\n{}",
                    result.pass,
                    result.message()
                ));
            }
        }
        if let Some(verdict) = self.verdict {
            if result.verdict != Verdict::from(verdict) {
                return Some(format!(
                    "expected verdict {:?}, got {:?}",
                    Verdict::from(verdict),
                    result.verdict
                ));
            }
        }
        let message = result.message();
        self.message_contains
            .iter()
            .find(|needle| !message.contains(needle.as_str()))
            .map(|needle| format!("message does not contain {needle:?}:\n{message}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: inline
description: fn(1)(2), fn(3) returning a value, fn(4) throwing
mock:
  calls:
    - args: [1]
      mock:
        calls:
          - args: [2]
    - args: [3]
      returns: 5
    - args: [4]
      throws: boom
cases:
  - name: full
    expect: [[1], [2]]
    pass: true
    verdict: full_match
  - name: partial
    expect: {args: [[1], [2], [3]]}
    pass: false
    verdict: partial_match
    message_contains: ["fn(1)(2)", "fn(3)", "fn(4)"]
  - name: alias
    matcher: toBeNestedCalledWith
    expect: [[3]]
    pass: true
  - name: misuse
    actual: 7
    expect: [[1]]
    usage_error: nesting mock
"#;

    #[test]
    fn test_inline_fixture_passes() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        assert_eq!(fixture.cases.len(), 4);
        fixture.run_and_assert();
    }

    #[test]
    fn test_failed_case_reports_detail() {
        let mut fixture = Fixture::from_yaml(FIXTURE).unwrap();
        fixture.cases[0].pass = Some(false);

        let results = fixture.run().unwrap();
        assert!(!results[0].passed);
        assert!(results[0].detail.contains("expected pass=false"));
        assert!(results[1].passed);
    }

    #[test]
    fn test_conflicting_outcomes_rejected() {
        let yaml = r#"
name: bad
mock:
  calls:
    - args: [1]
      returns: 1
      throws: 2
cases: []
"#;
        let fixture = Fixture::from_yaml(yaml).unwrap();
        let err = fixture.run().unwrap_err();
        assert!(err.contains("calls[0]"));
    }

    #[test]
    fn test_multi_document() {
        let yaml = format!("{FIXTURE}\n---\n{FIXTURE}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }
}
