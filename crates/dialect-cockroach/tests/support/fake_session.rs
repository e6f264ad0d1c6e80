use std::io;

use roachql_core::BoxError;
use roachql_dialect_cockroach::{Session, TableInfo};

#[derive(Debug, Default)]
pub struct FakeSession {
    pub executed_sql: Vec<String>,
    pub tables: Vec<TableInfo>,
    pub fail_on_sql: Option<String>,
}

impl Session for FakeSession {
    fn batch_execute(&mut self, sql: &str) -> Result<(), BoxError> {
        if self.fail_on_sql.as_deref() == Some(sql) {
            return Err(Box::new(io::Error::other("relation does not exist")));
        }
        self.executed_sql.push(sql.to_string());
        Ok(())
    }

    fn query_tables(&mut self, sql: &str) -> Result<Vec<TableInfo>, BoxError> {
        self.executed_sql.push(sql.to_string());
        Ok(self.tables.clone())
    }
}
