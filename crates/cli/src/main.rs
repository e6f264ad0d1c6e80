mod error_presentation;
mod logging;

use std::{
    fs,
    io::{self, Read},
    num::NonZeroUsize,
    path::PathBuf,
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand};
use error_presentation::{CliError, CliResult, render_runtime_error};
use roachql_core::{
    Connection, ConnectionConfig, ConnectionResolver, Driver, DriverRegistry, ExecuteError,
    Grammar, HostList, ResolvePolicy, SchemaCommand, TableReference,
};
use roachql_dialect_cockroach::{CockroachGrammar, Session, TableInfo};
use roachql_dialect_postgres::{PostgresConnector, PostgresGrammar, extra_keys};
use serde::Deserialize;
use tracing::debug;

const STDIN_MARKER: &str = "-";
const DEFAULT_HOST: &str = "127.0.0.1";

#[derive(Debug, Parser)]
#[command(
    name = "roachql",
    version,
    about = "Compile schema commands for CockroachDB and list cluster tables"
)]
struct Cli {
    /// Driver name or alias (cockroachdb, crdb, postgres, postgresql, pgsql).
    #[arg(long, global = true, default_value = "cockroachdb")]
    driver: String,
    /// Candidate host; repeat the flag or separate hosts with commas.
    #[arg(
        short = 'H',
        long = "host",
        global = true,
        value_delimiter = ',',
        default_value = DEFAULT_HOST
    )]
    hosts: Vec<String>,
    #[arg(long, global = true)]
    port: Option<u16>,
    #[arg(short = 'u', long = "user", global = true)]
    user: Option<String>,
    #[arg(long, global = true)]
    password: Option<String>,
    /// Prefix applied to every table name.
    #[arg(long, global = true, default_value = "")]
    prefix: String,
    #[arg(long, global = true)]
    sslmode: Option<String>,
    /// Dial up to N hosts at once instead of one at a time.
    #[arg(long, global = true, value_name = "N")]
    race: Option<NonZeroUsize>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Compile a YAML list of schema commands to SQL.
    Compile(CompileArgs),
    /// Resolve a connection and list the database's tables.
    Tables(TablesArgs),
}

#[derive(Debug, Args)]
struct CompileArgs {
    /// Command file, or `-` for stdin.
    #[arg(value_name = "FILE")]
    input: String,
}

#[derive(Debug, Args)]
struct TablesArgs {
    database: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandEntry {
    #[serde(default)]
    schema: Option<String>,
    table: String,
    command: SchemaCommand,
}

impl CommandEntry {
    fn table_reference(&self) -> TableReference {
        TableReference {
            schema: self.schema.clone(),
            name: self.table.clone(),
        }
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let driver = DriverRegistry::default()
        .driver(&cli.driver)
        .ok_or_else(|| CliError::UnknownDriver(cli.driver.clone()))?;

    match &cli.command {
        CliCommand::Compile(args) => compile(driver, &cli, args),
        CliCommand::Tables(args) => tables(driver, &cli, args),
    }
}

fn compile(driver: Driver, cli: &Cli, args: &CompileArgs) -> CliResult<()> {
    let source = read_input(&args.input)?;
    let entries: Vec<CommandEntry> =
        serde_yaml::from_str(&source).map_err(CliError::ParseInput)?;
    let grammar = grammar_for(driver, &cli.prefix);

    for entry in &entries {
        let sql = grammar.compile(&entry.command, &entry.table_reference())?;
        println!("{sql};");
    }
    Ok(())
}

fn tables(driver: Driver, cli: &Cli, args: &TablesArgs) -> CliResult<()> {
    let config = connection_config(cli, &args.database)?;
    let policy = cli
        .race
        .map_or(ResolvePolicy::Sequential, |max_in_flight| {
            ResolvePolicy::Race { max_in_flight }
        });

    let rows = match driver {
        Driver::Cockroach => {
            let mut resolver = roachql_dialect_cockroach::resolver().policy(policy);
            let mut connection = roachql_dialect_cockroach::connect_with(&mut resolver, &config)?;
            connection.tables()?
        }
        Driver::Postgres => {
            let mut resolver = ConnectionResolver::new(PostgresConnector::new()).policy(policy);
            let mut connection = resolver.resolve(&config)?;
            let grammar = PostgresGrammar::with_table_prefix(config.prefix.as_str());
            list_tables(&mut connection, &grammar)?
        }
    };
    debug!(rows = rows.len(), "listed tables");

    for row in rows {
        println!(
            "{}.{}\t{}\t{}",
            row.schema,
            row.name,
            row.size,
            row.comment.unwrap_or_default()
        );
    }
    Ok(())
}

fn list_tables<H: Session>(
    connection: &mut Connection<H>,
    grammar: &dyn Grammar,
) -> CliResult<Vec<TableInfo>> {
    let sql = grammar.compile_tables();
    let host = connection.host().to_string();
    connection.handle_mut().query_tables(&sql).map_err(|source| {
        CliError::from(roachql_core::Error::from(ExecuteError::StatementFailed {
            host,
            sql,
            source,
        }))
    })
}

fn grammar_for(driver: Driver, prefix: &str) -> Box<dyn Grammar> {
    let base = PostgresGrammar::with_table_prefix(prefix);
    match driver {
        Driver::Cockroach => Box::new(CockroachGrammar::new(base)),
        Driver::Postgres => Box::new(base),
    }
}

fn connection_config(cli: &Cli, database: &str) -> CliResult<ConnectionConfig> {
    let hosts = cli
        .hosts
        .iter()
        .map(|host| host.trim())
        .filter(|host| !host.is_empty());
    let hosts = HostList::new(hosts).map_err(CliError::Hosts)?;

    let mut config = ConnectionConfig::new(hosts, database);
    config.port = cli.port;
    config.username = cli.user.clone();
    config.password = cli.password.clone();
    config.prefix = cli.prefix.clone();
    if let Some(sslmode) = &cli.sslmode {
        config
            .extra
            .insert(extra_keys::SSLMODE.to_string(), sslmode.clone());
    }
    Ok(config)
}

fn read_input(input: &str) -> CliResult<String> {
    if input == STDIN_MARKER {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(CliError::ReadStdin)?;
        return Ok(source);
    }

    let path = PathBuf::from(input);
    fs::read_to_string(&path).map_err(|source| CliError::ReadFile { path, source })
}
