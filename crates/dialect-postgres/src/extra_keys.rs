//! Keys of `ConnectionConfig::extra` the connector interprets.

pub const SSLMODE: &str = "sslmode";
pub const APPLICATION_NAME: &str = "application_name";
pub const CONNECT_TIMEOUT: &str = "connect_timeout";
