use roachql_core::SchemaCommand;

mod yaml_runner;

pub use yaml_runner::{
    LoadError, TestCase, TestResult, load_test_cases_from_path, load_test_cases_from_str,
    matches_dialect, run_compile_suite, run_compile_test,
};

/// Case for `command` against an unqualified `table`, expecting `sql`.
pub fn sql_case(table: &str, command: SchemaCommand, sql: &str) -> TestCase {
    TestCase {
        schema: None,
        table: table.to_string(),
        command,
        sql: Some(sql.to_string()),
        error: None,
        dialect: None,
    }
}
