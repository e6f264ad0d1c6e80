use std::{collections::BTreeMap, fmt};

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("host list must contain at least one host")]
pub struct HostListError;

/// Candidate hosts of a connection. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "HostSpec")]
pub struct HostList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum HostSpec {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<HostSpec> for HostList {
    type Error = HostListError;

    fn try_from(spec: HostSpec) -> Result<Self, Self::Error> {
        match spec {
            HostSpec::One(host) => Ok(Self::single(host)),
            HostSpec::Many(hosts) => Self::new(hosts),
        }
    }
}

impl HostList {
    pub fn new<I, S>(hosts: I) -> Result<Self, HostListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let hosts = hosts.into_iter().map(Into::into).collect::<Vec<_>>();
        if hosts.is_empty() {
            return Err(HostListError);
        }
        Ok(Self(hosts))
    }

    pub fn single(host: impl Into<String>) -> Self {
        Self(vec![host.into()])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &str {
        self.0[0].as_str()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub host: HostList,
    #[serde(default)]
    pub port: Option<u16>,
    pub database: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub prefix: String,
    /// Driver options passed through untouched (`sslmode`, `application_name`, ...).
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl ConnectionConfig {
    pub fn new(host: HostList, database: impl Into<String>) -> Self {
        Self {
            host,
            port: None,
            database: database.into(),
            username: None,
            password: None,
            prefix: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Copy of this config with `host` narrowed to the given single host.
    pub fn with_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: HostList::single(host),
            ..self.clone()
        }
    }
}
