use std::{collections::BTreeSet, io, sync::Mutex};

use roachql_core::{BoxError, ConnectionConfig, Connector};

/// Handle returned by [`FakeConnector`]; records which host it came from.
#[derive(Debug, PartialEq, Eq)]
pub struct FakeHandle {
    pub host: String,
}

#[derive(Debug, Default)]
pub struct FakeConnector {
    accepting: BTreeSet<String>,
    attempts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeConnector {
    pub fn accepting<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepting: hosts.into_iter().map(Into::into).collect(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing_all() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Connector for FakeConnector {
    type Handle = FakeHandle;

    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Handle, BoxError> {
        assert_eq!(
            config.host.len(),
            1,
            "resolver must narrow the config to a single host"
        );
        let host = config.host.first().to_string();
        self.attempts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(host.clone());

        if self.accepting.contains(&host) {
            Ok(FakeHandle { host })
        } else {
            Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("connection refused by {host}"),
            )))
        }
    }
}
