use std::fmt;

use crate::CompileError;

/// Generic DDL features whose support differs between dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Fulltext,
    IndexStoring,
    AlterTableDropUnique,
    TotalRelationSize,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fulltext => "fulltext",
            Self::IndexStoring => "index_storing",
            Self::AlterTableDropUnique => "alter_table_drop_unique",
            Self::TotalRelationSize => "total_relation_size",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    Native,
    Unsupported { reason: &'static str },
    /// The generic syntax is not accepted; the dialect emits `with` instead.
    Replaced { with: &'static str },
}

#[derive(Debug, Clone, Copy)]
pub struct CapabilityTable {
    dialect: &'static str,
    entries: &'static [(Feature, Support)],
}

impl CapabilityTable {
    pub const fn new(dialect: &'static str, entries: &'static [(Feature, Support)]) -> Self {
        Self { dialect, entries }
    }

    pub fn dialect(&self) -> &'static str {
        self.dialect
    }

    pub fn support(&self, feature: Feature) -> Support {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == feature)
            .map(|(_, support)| *support)
            .unwrap_or(Support::Native)
    }

    pub fn supports(&self, feature: Feature) -> bool {
        !matches!(self.support(feature), Support::Unsupported { .. })
    }

    pub fn require(&self, feature: Feature) -> Result<(), CompileError> {
        match self.support(feature) {
            Support::Unsupported { reason } => Err(CompileError::UnsupportedFeature {
                feature,
                dialect: self.dialect.to_string(),
                reason: reason.to_string(),
            }),
            Support::Native | Support::Replaced { .. } => Ok(()),
        }
    }

    pub fn entries(&self) -> &'static [(Feature, Support)] {
        self.entries
    }
}
