mod catalog;
mod catalog_queries;
mod connector;
pub mod extra_keys;
mod grammar;

pub use catalog::{TableInfo, decode_table_row};
pub use connector::PostgresConnector;
pub use grammar::{DIALECT_NAME, PostgresGrammar, render_deferrable_clause, render_using_clause};
