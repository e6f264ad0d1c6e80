use roachql_core::{CapabilityTable, Feature, Support};

use crate::grammar::DIALECT_NAME;

const FULLTEXT_REASON: &str = "Fulltext indexes are not supported by CockroachDB as of version 2.5";

/// Where CockroachDB departs from the Postgres baseline.
pub(crate) static CAPABILITIES: CapabilityTable = CapabilityTable::new(
    DIALECT_NAME,
    &[
        (
            Feature::Fulltext,
            Support::Unsupported {
                reason: FULLTEXT_REASON,
            },
        ),
        (
            // cockroachdb/cockroach#42840
            Feature::AlterTableDropUnique,
            Support::Replaced {
                with: "drop index <table>@<index> cascade",
            },
        ),
        (
            // cockroachdb/cockroach#20712
            Feature::TotalRelationSize,
            Support::Replaced { with: "-1" },
        ),
        (Feature::IndexStoring, Support::Native),
    ],
);
