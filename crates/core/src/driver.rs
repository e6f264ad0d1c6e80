use std::collections::BTreeMap;

const COCKROACH_KEY: &str = "crdb";
const POSTGRES_KEY: &str = "pgsql";

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("cockroachdb", COCKROACH_KEY),
    ("postgres", POSTGRES_KEY),
    ("postgresql", POSTGRES_KEY),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Cockroach,
    Postgres,
}

impl Driver {
    pub fn key(self) -> &'static str {
        match self {
            Self::Cockroach => COCKROACH_KEY,
            Self::Postgres => POSTGRES_KEY,
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            COCKROACH_KEY => Some(Self::Cockroach),
            POSTGRES_KEY => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Maps driver names found in connection URLs or config (`cockroachdb://...`)
/// to internal driver keys.
#[derive(Debug, Clone)]
pub struct DriverRegistry {
    aliases: BTreeMap<String, String>,
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self {
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, key)| ((*alias).to_string(), (*key).to_string()))
                .collect(),
        }
    }
}

impl DriverRegistry {
    pub fn add_alias(&mut self, alias: impl Into<String>, key: impl Into<String>) {
        self.aliases
            .insert(alias.into().to_ascii_lowercase(), key.into());
    }

    /// Internal key for `name`; names without an alias are keys already.
    pub fn resolve_key(&self, name: &str) -> String {
        let normalized = name.trim().to_ascii_lowercase();
        self.aliases.get(&normalized).cloned().unwrap_or(normalized)
    }

    pub fn driver(&self, name: &str) -> Option<Driver> {
        Driver::from_key(&self.resolve_key(name))
    }
}
