use serde::Deserialize;

/// Abstract schema command handed to a grammar. Each instance describes one
/// migration operation and is consumed by a single compile call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaCommand {
    CreateIndex(IndexCommand),
    DropIndex(DropIndexCommand),
    CreateUniqueConstraint(UniqueCommand),
    DropUniqueConstraint(DropIndexCommand),
    CreateFulltextIndex(FulltextCommand),
    DropFulltextIndex(DropIndexCommand),
    ListTables,
}

impl SchemaCommand {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreateIndex(_) => "create_index",
            Self::DropIndex(_) => "drop_index",
            Self::CreateUniqueConstraint(_) => "create_unique_constraint",
            Self::DropUniqueConstraint(_) => "drop_unique_constraint",
            Self::CreateFulltextIndex(_) => "create_fulltext_index",
            Self::DropFulltextIndex(_) => "drop_fulltext_index",
            Self::ListTables => "list_tables",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexCommand {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    /// Non-key columns stored alongside the index.
    #[serde(default)]
    pub storing: Vec<String>,
}

impl IndexCommand {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }

    pub fn storing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.storing = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UniqueCommand {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub storing: Vec<String>,
    /// `None` leaves the deferrable clause out entirely.
    #[serde(default)]
    pub deferrable: Option<bool>,
    /// Only rendered when `deferrable` is `Some(true)`.
    #[serde(default)]
    pub initially_immediate: Option<bool>,
}

impl UniqueCommand {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn storing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.storing = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }

    pub fn initially_immediate(mut self, immediate: bool) -> Self {
        self.initially_immediate = Some(immediate);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FulltextCommand {
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl FulltextCommand {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            language: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropIndexCommand {
    pub name: String,
}

impl DropIndexCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
