//! nestmock CLI — driving adapter for nested call assertions.
//!
//! Subcommands:
//! - `run <fixtures.yaml>...` — run fixture files, report every case
//! - `eval <fixtures.yaml> --expect <json> [--fixture <name>] [--matcher <name>]`
//!   — evaluate an ad-hoc expected sequence against a fixture's mock
//! - `info` — print registered matcher names
//!
//! Logging goes to stderr and is filtered by `NESTMOCK_LOG` (default `warn`).

use std::process;

use nestmock::{Value, TO_HAVE_BEEN_NESTED_CALLED_WITH};
use nestmock_test::fixture::Fixture;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "NESTMOCK_LOG";

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "eval" => cmd_eval(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_run(paths: &[String]) -> Result<(), String> {
    if paths.is_empty() {
        return Err("run requires at least one fixture file".into());
    }

    let mut passed = 0usize;
    let mut failed = 0usize;

    for path in paths {
        for fixture in load_fixtures(path)? {
            let results = fixture
                .run()
                .map_err(|e| format!("{path}: fixture \"{}\": {e}", fixture.name))?;
            for result in results {
                if result.passed {
                    passed += 1;
                    println!("PASS  {} / {}", fixture.name, result.case_name);
                } else {
                    failed += 1;
                    println!("FAIL  {} / {}", fixture.name, result.case_name);
                    for line in result.detail.lines() {
                        println!("      {line}");
                    }
                }
            }
        }
    }

    println!("\n{passed} passed, {failed} failed");
    if failed > 0 {
        return Err(format!("{failed} case(s) failed"));
    }
    Ok(())
}

fn cmd_eval(args: &[String]) -> Result<(), String> {
    let args = EvalArgs::parse(args)?;

    let fixtures = load_fixtures(&args.path)?;
    let fixture = match &args.fixture {
        Some(name) => fixtures
            .iter()
            .find(|f| &f.name == name)
            .ok_or_else(|| format!("no fixture named \"{name}\" in \"{}\"", args.path))?,
        None => fixtures
            .first()
            .ok_or_else(|| format!("\"{}\" holds no fixtures", args.path))?,
    };
    debug!(fixture = %fixture.name, matcher = %args.matcher, "evaluating ad-hoc expectation");

    let mock = fixture.mock.build()?;
    let expected = parse_expected(&args.expect)?;
    let result = Fixture::registry()
        .evaluate(&args.matcher, &nestmock::DeepEquals, &Value::from(mock), &expected)
        .map_err(|e| format!("usage error: {e}"))?;

    if result.pass {
        println!("PASS ({:?})", result.verdict);
    } else {
        println!("FAIL ({:?})", result.verdict);
        println!("{}", result.message());
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    let registry = Fixture::registry();

    println!("Registered matchers:");
    for name in registry.names() {
        println!("  {name}");
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_fixtures(path: &str) -> Result<Vec<Fixture>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))?;
    Fixture::from_yaml_multi(&content).map_err(|e| format!("YAML parse error in \"{path}\": {e}"))
}

fn parse_expected(json: &str) -> Result<Value, String> {
    serde_json::from_str::<serde_json::Value>(json)
        .map(Value::from)
        .map_err(|e| format!("--expect is not valid JSON: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, PartialEq, Eq)]
struct EvalArgs {
    path: String,
    expect: String,
    fixture: Option<String>,
    matcher: String,
}

impl EvalArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let Some((path, rest)) = args.split_first() else {
            return Err("eval requires a fixture file path".into());
        };

        let mut expect = None;
        let mut fixture = None;
        let mut matcher = None;
        let mut iter = rest.iter();

        while let Some(flag) = iter.next() {
            let slot = match flag.as_str() {
                "--expect" => &mut expect,
                "--fixture" => &mut fixture,
                "--matcher" => &mut matcher,
                other => return Err(format!("unexpected argument \"{other}\"")),
            };
            let value = iter
                .next()
                .ok_or_else(|| format!("{flag} requires a value"))?;
            *slot = Some(value.clone());
        }

        Ok(Self {
            path: path.clone(),
            expect: expect.ok_or("eval requires --expect <json>")?,
            fixture,
            matcher: matcher.unwrap_or_else(|| TO_HAVE_BEEN_NESTED_CALLED_WITH.to_owned()),
        })
    }
}

fn print_usage() {
    eprintln!(
        "Usage: nestmock <command> [options]

Commands:
  run <fixtures.yaml>...                   Run fixture files
  eval <fixtures.yaml> --expect <json>     Evaluate an expected sequence
       [--fixture <name>] [--matcher <name>]
  info                                     Print registered matcher names
  help                                     Show this help

Environment:
  {LOG_ENV}                             Log filter (default: warn)"
    );
}
