use roachql_core::{
    CapabilityTable, CompileError, DateFormat, DropIndexCommand, Feature, FulltextCommand,
    Grammar, IdentifierQuoting, IndexCommand, SchemaCommand, Support, TableReference,
    UniqueCommand,
};

use crate::catalog_queries;

pub const DIALECT_NAME: &str = "postgres";
const DEFAULT_FULLTEXT_LANGUAGE: &str = "english";

static CAPABILITIES: CapabilityTable = CapabilityTable::new(
    DIALECT_NAME,
    &[(
        Feature::IndexStoring,
        Support::Unsupported {
            reason: "postgres has no `storing` clause for indexes",
        },
    )],
);

/// Baseline Postgres schema grammar. Other Postgres-wire dialects hold one of
/// these for identifier quoting and shared clause rendering.
#[derive(Debug, Clone, Default)]
pub struct PostgresGrammar {
    table_prefix: String,
    date_format: DateFormat,
}

impl PostgresGrammar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table_prefix(prefix: impl Into<String>) -> Self {
        Self {
            table_prefix: prefix.into(),
            ..Self::default()
        }
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    fn compile_index(
        &self,
        table: &TableReference,
        index: &IndexCommand,
    ) -> Result<String, CompileError> {
        if !index.storing.is_empty() {
            CAPABILITIES.require(Feature::IndexStoring)?;
        }

        Ok(format!(
            "create index {} on {}{} ({})",
            self.wrap(&index.name),
            self.wrap_table(table),
            render_using_clause(index.algorithm.as_deref()),
            self.columnize(&index.columns)
        ))
    }

    fn compile_unique(
        &self,
        table: &TableReference,
        unique: &UniqueCommand,
    ) -> Result<String, CompileError> {
        if !unique.storing.is_empty() {
            CAPABILITIES.require(Feature::IndexStoring)?;
        }

        Ok(format!(
            "alter table {} add constraint {} unique ({}){}",
            self.wrap_table(table),
            self.wrap(&unique.name),
            self.columnize(&unique.columns),
            render_deferrable_clause(unique.deferrable, unique.initially_immediate)
        ))
    }

    fn compile_drop_unique(&self, table: &TableReference, drop: &DropIndexCommand) -> String {
        format!(
            "alter table {} drop constraint {}",
            self.wrap_table(table),
            self.wrap(&drop.name)
        )
    }

    fn compile_drop_index(&self, drop: &DropIndexCommand) -> String {
        format!("drop index {}", self.wrap(&drop.name))
    }

    fn compile_fulltext(&self, table: &TableReference, fulltext: &FulltextCommand) -> String {
        let language = quote_string(
            fulltext
                .language
                .as_deref()
                .unwrap_or(DEFAULT_FULLTEXT_LANGUAGE),
        );
        let vectors = fulltext
            .columns
            .iter()
            .map(|column| format!("to_tsvector({language}, {})", self.wrap(column)))
            .collect::<Vec<_>>()
            .join(" || ");

        format!(
            "create index {} on {} using gin (({vectors}))",
            self.wrap(&fulltext.name),
            self.wrap_table(table)
        )
    }
}

impl IdentifierQuoting for PostgresGrammar {
    fn wrap(&self, value: &str) -> String {
        value
            .split('.')
            .map(wrap_segment)
            .collect::<Vec<_>>()
            .join(".")
    }

    fn wrap_table(&self, table: &TableReference) -> String {
        let name = wrap_segment(&format!("{}{}", self.table_prefix, table.name));
        match &table.schema {
            Some(schema) => format!("{}.{name}", wrap_segment(schema)),
            None => name,
        }
    }
}

impl Grammar for PostgresGrammar {
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
            SchemaCommand::CreateIndex(index) => self.compile_index(table, index),
            SchemaCommand::CreateUniqueConstraint(unique) => self.compile_unique(table, unique),
            SchemaCommand::DropUniqueConstraint(drop) => Ok(self.compile_drop_unique(table, drop)),
            SchemaCommand::DropIndex(drop) | SchemaCommand::DropFulltextIndex(drop) => {
                Ok(self.compile_drop_index(drop))
            }
            SchemaCommand::CreateFulltextIndex(fulltext) => {
                Ok(self.compile_fulltext(table, fulltext))
            }
            SchemaCommand::ListTables => Ok(self.compile_tables()),
        }
    }

    fn compile_tables(&self) -> String {
        catalog_queries::TABLES_QUERY.to_string()
    }

    fn date_format(&self) -> &DateFormat {
        &self.date_format
    }
}

/// ` using <algorithm>` or nothing.
pub fn render_using_clause(algorithm: Option<&str>) -> String {
    algorithm
        .filter(|algorithm| !algorithm.is_empty())
        .map(|algorithm| format!(" using {algorithm}"))
        .unwrap_or_default()
}

/// Constraint timing suffix. An unset `deferrable` renders nothing; the
/// initially clause needs `deferrable == Some(true)` and a set immediate flag.
pub fn render_deferrable_clause(
    deferrable: Option<bool>,
    initially_immediate: Option<bool>,
) -> String {
    let mut sql = String::new();

    match deferrable {
        Some(true) => sql.push_str(" deferrable"),
        Some(false) => sql.push_str(" not deferrable"),
        None => {}
    }

    if deferrable == Some(true) {
        match initially_immediate {
            Some(true) => sql.push_str(" initially immediate"),
            Some(false) => sql.push_str(" initially deferred"),
            None => {}
        }
    }

    sql
}

fn wrap_segment(segment: &str) -> String {
    if segment == "*" {
        return segment.to_string();
    }
    format!("\"{}\"", segment.replace('"', "\"\""))
}

fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
