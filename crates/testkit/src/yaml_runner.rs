use std::{collections::BTreeMap, fs, io, path::Path, path::PathBuf};

use roachql_core::{CompileError, Grammar, SchemaCommand, TableReference};
use serde::Deserialize;

const TESTCASE_SOURCE_LABEL: &str = "yaml testcase";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub table: String,
    pub command: SchemaCommand,
    /// Exact SQL the grammar must emit.
    #[serde(default)]
    pub sql: Option<String>,
    /// Expected failure: a feature id such as `fulltext`, or the full message.
    #[serde(default)]
    pub error: Option<String>,
    /// Dialect filter: `cockroachdb` runs only there, `!postgres` everywhere else.
    #[serde(default)]
    pub dialect: Option<String>,
}

impl TestCase {
    pub fn table_reference(&self) -> TableReference {
        TableReference {
            schema: self.schema.clone(),
            name: self.table.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Skipped(String),
    Failed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {label}: {source}")]
    Yaml {
        label: String,
        #[source]
        source: serde_yaml::Error,
    },
}

pub fn load_test_cases_from_str(yaml: &str) -> Result<BTreeMap<String, TestCase>, LoadError> {
    serde_yaml::from_str(yaml).map_err(|source| LoadError::Yaml {
        label: TESTCASE_SOURCE_LABEL.to_string(),
        source,
    })
}

pub fn load_test_cases_from_path(path: &Path) -> Result<BTreeMap<String, TestCase>, LoadError> {
    let yaml = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&yaml).map_err(|source| LoadError::Yaml {
        label: path.display().to_string(),
        source,
    })
}

pub fn matches_dialect(requirement: Option<&str>, current_dialect: &str) -> bool {
    let Some(requirement) = requirement.map(str::trim).filter(|value| !value.is_empty()) else {
        return true;
    };

    if let Some(excluded_dialect) = requirement.strip_prefix('!') {
        return excluded_dialect != current_dialect;
    }

    requirement == current_dialect
}

pub fn run_compile_test(grammar: &dyn Grammar, test: &TestCase) -> TestResult {
    if !matches_dialect(test.dialect.as_deref(), grammar.name()) {
        return TestResult::Skipped(format!(
            "testcase requires dialect '{}', running on '{}'",
            test.dialect.as_deref().unwrap_or_default(),
            grammar.name()
        ));
    }

    match (&test.sql, &test.error) {
        (Some(_), Some(_)) | (None, None) => {
            return TestResult::Failed(
                "exactly one of `sql` and `error` must be set".to_string(),
            );
        }
        _ => {}
    }

    let outcome = grammar.compile(&test.command, &test.table_reference());
    match (outcome, test.sql.as_deref(), test.error.as_deref()) {
        (Ok(actual), Some(expected), _) => {
            if actual == expected {
                TestResult::Passed
            } else {
                TestResult::Failed(format!(
                    "SQL mismatch\nexpected: {expected}\n  actual: {actual}"
                ))
            }
        }
        (Ok(actual), None, expected_error) => TestResult::Failed(format!(
            "expected error: {}, but compiled to: {actual}",
            expected_error.unwrap_or_default()
        )),
        (Err(error), _, Some(expected_error)) => {
            if error_matches(&error, expected_error) {
                TestResult::Passed
            } else {
                TestResult::Failed(format!(
                    "expected error: {expected_error}, but got: {error}"
                ))
            }
        }
        (Err(error), _, None) => TestResult::Failed(format!("unexpected error: {error}")),
    }
}

/// Runs every case, returning `name: reason` for each failure.
pub fn run_compile_suite(
    grammar: &dyn Grammar,
    cases: &BTreeMap<String, TestCase>,
) -> Vec<String> {
    cases
        .iter()
        .filter_map(|(name, case)| match run_compile_test(grammar, case) {
            TestResult::Failed(reason) => Some(format!("{name}: {reason}")),
            TestResult::Passed | TestResult::Skipped(_) => None,
        })
        .collect()
}

fn error_matches(error: &CompileError, expected: &str) -> bool {
    let expected = expected.trim();
    error.feature().as_str() == expected || error.to_string() == expected
}
