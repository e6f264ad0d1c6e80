mod connection;
mod grammar;
mod quirks;

pub use connection::{
    CockroachConnection, DEFAULT_COCKROACH_PORT, Session, connect, connect_with, resolver,
    resolver_with_shuffle,
};
pub use grammar::{CockroachGrammar, DIALECT_NAME};
pub use roachql_dialect_postgres::TableInfo;
