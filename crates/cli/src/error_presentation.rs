use std::{io, path::PathBuf};

use miette::Report;

const COMPILE_CONTEXT: &str = "while compiling schema commands";
const CONNECT_CONTEXT: &str = "while resolving a cluster connection";
const EXECUTE_CONTEXT: &str = "while querying the catalog";
const FILE_READ_CONTEXT: &str = "while reading command file";
const STDIN_READ_CONTEXT: &str = "while reading commands from stdin";
const INPUT_PARSE_CONTEXT: &str = "while parsing schema commands";
const HOSTS_CONTEXT: &str = "while reading --host";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    UnknownDriver(String),
    Hosts(roachql_core::HostListError),
    ReadFile { path: PathBuf, source: io::Error },
    ReadStdin(io::Error),
    ParseInput(serde_yaml::Error),
    Core(roachql_core::Error),
}

impl From<roachql_core::Error> for CliError {
    fn from(value: roachql_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<roachql_core::CompileError> for CliError {
    fn from(value: roachql_core::CompileError) -> Self {
        Self::Core(value.into())
    }
}

impl From<roachql_core::ConnectError> for CliError {
    fn from(value: roachql_core::ConnectError) -> Self {
        Self::Core(value.into())
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::UnknownDriver(name) => format!("[config] {}", unknown_driver_message(&name)),
        CliError::Hosts(source) => {
            let report = report_with_context(source, HOSTS_CONTEXT);
            format!("[config] {report}")
        }
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::ReadStdin(source) => {
            let report = report_with_context(source, STDIN_READ_CONTEXT);
            format!("[io] {report}")
        }
        CliError::ParseInput(source) => {
            let report = report_with_context(source, INPUT_PARSE_CONTEXT);
            format!("[input] {report}")
        }
        CliError::Core(source) => {
            let (category, context) = core_category(&source);
            let report = report_with_context(source, context);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let anyhow_error = anyhow::Error::new(source).context(context.into());
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &roachql_core::Error) -> (&'static str, &'static str) {
    match error {
        roachql_core::Error::Compile(_) => ("compile", COMPILE_CONTEXT),
        roachql_core::Error::Connect(_) => ("connect", CONNECT_CONTEXT),
        roachql_core::Error::Execute(_) => ("execute", EXECUTE_CONTEXT),
    }
}

fn unknown_driver_message(name: &str) -> String {
    format!("unknown driver `{name}`; expected one of cockroachdb, crdb, postgres, pgsql")
}

