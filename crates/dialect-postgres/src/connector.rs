use std::{io, time::Duration};

use postgres::{Client, NoTls, config::SslMode};
use roachql_core::{BoxError, ConnectionConfig, Connector};
use tracing::debug;

use crate::extra_keys;

const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Opens blocking `postgres` clients for one host at a time.
#[derive(Debug, Clone, Copy)]
pub struct PostgresConnector {
    default_port: u16,
}

impl Default for PostgresConnector {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_POSTGRES_PORT,
        }
    }
}

impl PostgresConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Port used when neither the host entry nor the config names one.
    pub fn with_default_port(default_port: u16) -> Self {
        Self { default_port }
    }

    pub fn client_config(&self, config: &ConnectionConfig) -> io::Result<postgres::Config> {
        let mut postgres_config = postgres::Config::new();
        let (host, host_port) = split_host_port(config.host.first());

        if host.starts_with('/') {
            postgres_config.host_path(host);
        } else {
            postgres_config.host(host);
        }
        postgres_config.port(host_port.or(config.port).unwrap_or(self.default_port));

        if let Some(user) = &config.username {
            postgres_config.user(user);
        }
        if let Some(password) = &config.password {
            postgres_config.password(password);
        }
        postgres_config.dbname(&config.database);

        if let Some(sslmode) = config.extra.get(extra_keys::SSLMODE) {
            postgres_config.ssl_mode(parse_ssl_mode(sslmode)?);
        }
        if let Some(application_name) = config.extra.get(extra_keys::APPLICATION_NAME) {
            postgres_config.application_name(application_name);
        }
        if let Some(timeout) = config.extra.get(extra_keys::CONNECT_TIMEOUT) {
            postgres_config.connect_timeout(parse_connect_timeout(timeout)?);
        }

        Ok(postgres_config)
    }
}

impl Connector for PostgresConnector {
    type Handle = Client;

    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Handle, BoxError> {
        let postgres_config = self.client_config(config)?;
        debug!(host = config.host.first(), "opening postgres connection");
        Ok(postgres_config.connect(NoTls)?)
    }
}

/// Splits an optional `:port` suffix off a host entry. Bare IPv6 addresses
/// and socket paths are returned unchanged.
fn split_host_port(entry: &str) -> (&str, Option<u16>) {
    if entry.starts_with('/') {
        return (entry, None);
    }

    if let Some(rest) = entry.strip_prefix('[') {
        if let Some((address, suffix)) = rest.split_once(']') {
            let port = suffix.strip_prefix(':').and_then(|port| port.parse().ok());
            return (address, port);
        }
        return (entry, None);
    }

    match entry.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => match port.parse() {
            Ok(port) => (host, Some(port)),
            Err(_) => (entry, None),
        },
        _ => (entry, None),
    }
}

/// Connections are plaintext (`NoTls`), so only modes that can settle on a
/// plaintext session are accepted.
fn parse_ssl_mode(raw: &str) -> io::Result<SslMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "disable" => Ok(SslMode::Disable),
        "prefer" | "allow" => Ok(SslMode::Prefer),
        mode @ ("require" | "verify-ca" | "verify-full") => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("sslmode `{mode}` needs TLS, which this connector does not provide"),
        )),
        other => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsupported sslmode `{other}`"),
        )),
    }
}

fn parse_connect_timeout(raw: &str) -> io::Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("connect_timeout must be whole seconds, got `{raw}`"),
            )
        })
}
