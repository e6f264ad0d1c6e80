use crate::{CapabilityTable, CompileError, DateFormat, SchemaCommand, TableReference};

/// Identifier quoting of a baseline dialect. Dialect grammars hold an
/// implementation of this instead of re-deriving quoting rules.
pub trait IdentifierQuoting: Send + Sync {
    fn wrap(&self, value: &str) -> String;

    fn wrap_table(&self, table: &TableReference) -> String;

    fn columnize(&self, columns: &[String]) -> String {
        columns
            .iter()
            .map(|column| self.wrap(column))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub trait Grammar: Send + Sync {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> &CapabilityTable;

    fn compile(
        &self,
        command: &SchemaCommand,
        table: &TableReference,
    ) -> Result<String, CompileError>;

    fn compile_tables(&self) -> String;

    fn date_format(&self) -> &DateFormat;
}
