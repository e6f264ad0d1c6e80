use postgres::Client;
use roachql_core::{
    BoxError, Connection, ConnectionConfig, ConnectionResolver, ExecuteError, Grammar,
    HostShuffle, RandomShuffle, Result, SchemaCommand, TableReference,
};
use roachql_dialect_postgres::{PostgresConnector, TableInfo, decode_table_row};
use tracing::debug;

use crate::CockroachGrammar;

pub const DEFAULT_COCKROACH_PORT: u16 = 26257;

/// SQL surface the connection needs from its transport handle.
pub trait Session: Send {
    fn batch_execute(&mut self, sql: &str) -> std::result::Result<(), BoxError>;

    fn query_tables(&mut self, sql: &str) -> std::result::Result<Vec<TableInfo>, BoxError>;
}

impl Session for Client {
    fn batch_execute(&mut self, sql: &str) -> std::result::Result<(), BoxError> {
        Ok(Client::batch_execute(self, sql)?)
    }

    fn query_tables(&mut self, sql: &str) -> std::result::Result<Vec<TableInfo>, BoxError> {
        let rows = self.query(sql, &[])?;
        Ok(rows
            .iter()
            .map(decode_table_row)
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

/// Resolver over the `postgres` connector, defaulting to CockroachDB's port.
pub fn resolver() -> ConnectionResolver<PostgresConnector> {
    ConnectionResolver::new(PostgresConnector::with_default_port(DEFAULT_COCKROACH_PORT))
}

pub fn resolver_with_shuffle<S: HostShuffle>(
    shuffle: S,
) -> ConnectionResolver<PostgresConnector, S> {
    ConnectionResolver::with_shuffle(
        PostgresConnector::with_default_port(DEFAULT_COCKROACH_PORT),
        shuffle,
    )
}

/// Tries the configured hosts in random order and wraps the first live client.
pub fn connect(config: &ConnectionConfig) -> Result<CockroachConnection> {
    let connection = resolver().resolve(config)?;
    Ok(CockroachConnection::new(connection))
}

pub fn connect_with<S: HostShuffle>(
    resolver: &mut ConnectionResolver<PostgresConnector, S>,
    config: &ConnectionConfig,
) -> Result<CockroachConnection> {
    let connection = resolver.resolve(config)?;
    Ok(CockroachConnection::new(connection))
}

/// A resolved connection paired with a grammar using its table prefix.
#[derive(Debug)]
pub struct CockroachConnection<H = Client> {
    inner: Connection<H>,
    grammar: CockroachGrammar,
}

impl<H> CockroachConnection<H> {
    pub fn new(inner: Connection<H>) -> Self {
        let grammar = CockroachGrammar::for_config(inner.config());
        Self { inner, grammar }
    }

    pub fn with_grammar(self, grammar: CockroachGrammar) -> Self {
        Self { grammar, ..self }
    }

    pub fn grammar(&self) -> &CockroachGrammar {
        &self.grammar
    }

    pub fn host(&self) -> &str {
        self.inner.host()
    }

    pub fn database(&self) -> &str {
        self.inner.database()
    }

    pub fn prefix(&self) -> &str {
        self.inner.prefix()
    }

    pub fn inner(&self) -> &Connection<H> {
        &self.inner
    }

    pub fn into_inner(self) -> Connection<H> {
        self.inner
    }
}

impl<H: Session> CockroachConnection<H> {
    pub fn execute(&mut self, sql: &str) -> Result<()> {
        debug!(host = self.inner.host(), sql, "executing statement");
        let host = self.inner.host().to_string();
        self.inner
            .handle_mut()
            .batch_execute(sql)
            .map_err(|source| statement_failed(host, sql, source))
    }

    /// Compiles `command` and executes it, returning the SQL that ran.
    pub fn run(&mut self, command: &SchemaCommand, table: &TableReference) -> Result<String> {
        let sql = self.grammar.compile(command, table)?;
        self.execute(&sql)?;
        Ok(sql)
    }

    pub fn tables(&mut self) -> Result<Vec<TableInfo>> {
        let sql = self.grammar.compile_tables();
        debug!(host = self.inner.host(), "listing tables");
        let host = self.inner.host().to_string();
        self.inner
            .handle_mut()
            .query_tables(&sql)
            .map_err(|source| statement_failed(host, &sql, source))
    }
}

fn statement_failed(host: String, sql: &str, source: BoxError) -> roachql_core::Error {
    ExecuteError::StatementFailed {
        host,
        sql: sql.to_string(),
        source,
    }
    .into()
}
