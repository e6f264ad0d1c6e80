use std::time::Duration;

use postgres::config::{Host, SslMode};
use roachql_core::{ConnectionConfig, HostList};
use roachql_dialect_postgres::PostgresConnector;

fn config(host: &str) -> ConnectionConfig {
    let mut config = ConnectionConfig::new(HostList::single(host), "app");
    config.username = Some("roach".to_string());
    config.password = Some("secret".to_string());
    config
}

#[test]
fn client_config_maps_connection_fields() {
    let mut config = config("node1");
    config.port = Some(26258);
    config
        .extra
        .insert("application_name".to_string(), "migrator".to_string());
    config
        .extra
        .insert("connect_timeout".to_string(), "5".to_string());
    config
        .extra
        .insert("sslmode".to_string(), "disable".to_string());

    let client_config = PostgresConnector::with_default_port(26257)
        .client_config(&config)
        .expect("config maps");

    assert_eq!(client_config.get_hosts(), &[Host::Tcp("node1".to_string())]);
    assert_eq!(client_config.get_ports(), &[26258]);
    assert_eq!(client_config.get_user(), Some("roach"));
    assert_eq!(client_config.get_password(), Some(&b"secret"[..]));
    assert_eq!(client_config.get_dbname(), Some("app"));
    assert_eq!(client_config.get_application_name(), Some("migrator"));
    assert_eq!(
        client_config.get_connect_timeout(),
        Some(&Duration::from_secs(5))
    );
    assert_eq!(client_config.get_ssl_mode(), SslMode::Disable);
}

#[test]
fn host_port_suffix_overrides_config_port_and_default() {
    let client_config = PostgresConnector::with_default_port(26257)
        .client_config(&config("node3:26300"))
        .expect("config maps");
    assert_eq!(client_config.get_hosts(), &[Host::Tcp("node3".to_string())]);
    assert_eq!(client_config.get_ports(), &[26300]);

    let defaulted = PostgresConnector::with_default_port(26257)
        .client_config(&config("node3"))
        .expect("config maps");
    assert_eq!(defaulted.get_ports(), &[26257]);
}

#[test]
fn unknown_sslmode_is_rejected() {
    let mut config = config("node1");
    config
        .extra
        .insert("sslmode".to_string(), "sometimes".to_string());

    let error = PostgresConnector::new()
        .client_config(&config)
        .expect_err("sslmode must be recognised");

    assert!(error.to_string().contains("sometimes"));
}

#[test]
fn tls_sslmodes_are_rejected_before_dialing() {
    for mode in ["require", "verify-ca", "Verify-Full"] {
        let mut config = config("node1");
        config.extra.insert("sslmode".to_string(), mode.to_string());

        let error = PostgresConnector::new()
            .client_config(&config)
            .expect_err("tls modes need a tls connector");

        assert_eq!(error.kind(), std::io::ErrorKind::Unsupported);
        assert!(error.to_string().contains("needs TLS"), "unexpected error: {error}");
        assert!(error.to_string().contains(&mode.to_ascii_lowercase()));
    }
}

#[test]
fn plaintext_compatible_sslmodes_map_to_prefer() {
    for mode in ["prefer", "allow"] {
        let mut config = config("node1");
        config.extra.insert("sslmode".to_string(), mode.to_string());

        let client_config = PostgresConnector::new()
            .client_config(&config)
            .expect("plaintext-compatible mode maps");

        assert_eq!(client_config.get_ssl_mode(), SslMode::Prefer);
    }
}

#[test]
fn tls_sslmode_fails_connect_without_network() {
    use roachql_core::Connector;

    let mut config = config("127.0.0.1:1");
    config
        .extra
        .insert("sslmode".to_string(), "verify-full".to_string());

    let Err(error) = PostgresConnector::new().connect(&config) else {
        panic!("tls modes must be rejected");
    };

    assert!(error.to_string().contains("needs TLS"), "unexpected error: {error}");
}
