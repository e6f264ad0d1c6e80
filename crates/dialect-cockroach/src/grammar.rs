use roachql_core::{
    CapabilityTable, CompileError, ConnectionConfig, DateFormat, DropIndexCommand, Feature,
    Grammar, IdentifierQuoting, IndexCommand, SchemaCommand, Support, TableReference,
    UniqueCommand,
};
use roachql_dialect_postgres::{PostgresGrammar, render_deferrable_clause, render_using_clause};

use crate::quirks::CAPABILITIES;

pub const DIALECT_NAME: &str = "cockroachdb";

const TOTAL_RELATION_SIZE: &str = "pg_total_relation_size(c.oid)";

/// CockroachDB schema grammar. Quoting, table prefixing and the shared clause
/// renderers come from the wrapped Postgres grammar.
#[derive(Debug, Clone, Default)]
pub struct CockroachGrammar {
    base: PostgresGrammar,
}

impl CockroachGrammar {
    pub fn new(base: PostgresGrammar) -> Self {
        Self { base }
    }

    /// Grammar using the table prefix of `config`.
    pub fn for_config(config: &ConnectionConfig) -> Self {
        Self::new(PostgresGrammar::with_table_prefix(config.prefix.as_str()))
    }

    pub fn with_date_format(self, date_format: DateFormat) -> Self {
        Self {
            base: self.base.with_date_format(date_format),
        }
    }

    pub fn base(&self) -> &PostgresGrammar {
        &self.base
    }

    fn compile_index(&self, table: &TableReference, index: &IndexCommand) -> String {
        format!(
            "create index {} on {}{} ({}){}",
            self.base.wrap(&index.name),
            self.base.wrap_table(table),
            render_using_clause(index.algorithm.as_deref()),
            self.base.columnize(&index.columns),
            self.storing_clause(&index.storing)
        )
    }

    fn compile_unique(&self, table: &TableReference, unique: &UniqueCommand) -> String {
        format!(
            "alter table {} add constraint {} unique ({}){}{}",
            self.base.wrap_table(table),
            self.base.wrap(&unique.name),
            self.base.columnize(&unique.columns),
            self.storing_clause(&unique.storing),
            render_deferrable_clause(unique.deferrable, unique.initially_immediate)
        )
    }

    // No `alter table ... drop constraint` for unique constraints; they are
    // dropped through their backing index.
    fn compile_drop_index(&self, table: &TableReference, drop: &DropIndexCommand) -> String {
        format!(
            "drop index {}@{} cascade",
            self.base.wrap_table(table),
            self.base.wrap(&drop.name)
        )
    }

    fn storing_clause(&self, storing: &[String]) -> String {
        if storing.is_empty() {
            return String::new();
        }
        format!(" storing ({})", self.base.columnize(storing))
    }
}

impl Grammar for CockroachGrammar {
    fn name(&self) -> &'static str {
        DIALECT_NAME
    }

    fn capabilities(&self) -> &CapabilityTable {
        &CAPABILITIES
    }

    fn compile(
        &self,
        command: &SchemaCommand,
        table: &TableReference,
    ) -> Result<String, CompileError> {
        match command {
            SchemaCommand::CreateIndex(index) => Ok(self.compile_index(table, index)),
            SchemaCommand::CreateUniqueConstraint(unique) => Ok(self.compile_unique(table, unique)),
            SchemaCommand::DropUniqueConstraint(drop) => {
                match CAPABILITIES.support(Feature::AlterTableDropUnique) {
                    Support::Replaced { .. } => Ok(self.compile_drop_index(table, drop)),
                    Support::Native | Support::Unsupported { .. } => {
                        CAPABILITIES.require(Feature::AlterTableDropUnique)?;
                        self.base.compile(command, table)
                    }
                }
            }
            SchemaCommand::DropIndex(drop) | SchemaCommand::DropFulltextIndex(drop) => {
                Ok(self.compile_drop_index(table, drop))
            }
            SchemaCommand::CreateFulltextIndex(_) => {
                CAPABILITIES.require(Feature::Fulltext)?;
                self.base.compile(command, table)
            }
            SchemaCommand::ListTables => Ok(self.compile_tables()),
        }
    }

    fn compile_tables(&self) -> String {
        let size = match CAPABILITIES.support(Feature::TotalRelationSize) {
            Support::Replaced { with } => with,
            Support::Native | Support::Unsupported { .. } => TOTAL_RELATION_SIZE,
        };
        format!(
            "select c.relname as name, n.nspname as schema, {size} as size, \
obj_description(c.oid, 'pg_class') as comment from pg_class c, pg_namespace n \
where c.relkind = 'r' and n.oid = c.relnamespace \
order by c.relname"
        )
    }

    fn date_format(&self) -> &DateFormat {
        self.base.date_format()
    }
}
