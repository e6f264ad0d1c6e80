use std::{
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use roachql_core::{
    ConnectError, ConnectionConfig, ConnectionResolver, HostList, HostShuffle, NoShuffle,
    RandomShuffle, ResolvePolicy,
};

#[path = "support/fake_connector.rs"]
mod fake_connector;

#[path = "support/timed_connector.rs"]
mod timed_connector;

use fake_connector::{FakeConnector, FakeHandle};
use timed_connector::TimedConnector;

/// Reverses the configured order so tests can observe the permutation being used.
struct Reverse;

impl HostShuffle for Reverse {
    fn shuffle(&mut self, hosts: &mut [String]) {
        hosts.reverse();
    }
}

fn cluster_config(hosts: &[&str]) -> ConnectionConfig {
    let mut config = ConnectionConfig::new(
        HostList::new(hosts.iter().copied()).expect("non-empty host list"),
        "app",
    );
    config.port = Some(26257);
    config.username = Some("root".to_string());
    config.prefix = "app_".to_string();
    config
}

#[test]
fn succeeds_on_the_only_accepting_host_for_any_seed() {
    let config = cluster_config(&["a", "b", "c"]);

    for seed in 0..32 {
        let mut resolver = ConnectionResolver::with_shuffle(
            FakeConnector::accepting(["b"]),
            RandomShuffle::seeded(seed),
        );

        let connection = resolver
            .resolve(&config)
            .unwrap_or_else(|error| panic!("seed {seed} should connect: {error}"));

        assert_eq!(connection.host(), "b");
        assert_eq!(connection.handle(), &FakeHandle { host: "b".to_string() });
        assert_eq!(connection.database(), "app");
        assert_eq!(connection.prefix(), "app_");
        assert_eq!(connection.config().port, Some(26257));
        assert_eq!(connection.config().host.as_slice(), ["b".to_string()]);
    }
}

#[test]
fn stops_at_first_accepting_host() {
    let config = cluster_config(&["a", "b", "c"]);
    let mut resolver =
        ConnectionResolver::with_shuffle(FakeConnector::accepting(["a", "b", "c"]), NoShuffle);

    let connection = resolver.resolve(&config).expect("first host accepts");

    assert_eq!(connection.host(), "a");
    assert_eq!(resolver.connector().attempts(), vec!["a".to_string()]);
}

#[test]
fn tries_hosts_in_permutation_order() {
    let config = cluster_config(&["a", "b", "c"]);
    let mut resolver = ConnectionResolver::with_shuffle(FakeConnector::accepting(["a"]), Reverse);

    let connection = resolver.resolve(&config).expect("a accepts");

    assert_eq!(connection.host(), "a");
    assert_eq!(
        resolver.connector().attempts(),
        vec!["c".to_string(), "b".to_string(), "a".to_string()]
    );
}

#[test]
fn same_seed_yields_same_attempt_order() {
    let config = cluster_config(&["n1", "n2", "n3", "n4", "n5"]);

    let attempts_for = |seed| {
        let mut resolver = ConnectionResolver::with_shuffle(
            FakeConnector::refusing_all(),
            RandomShuffle::seeded(seed),
        );
        let _ = resolver.resolve(&config);
        resolver.connector().attempts()
    };

    assert_eq!(attempts_for(7), attempts_for(7));
}

#[test]
fn exhausted_resolution_reports_every_attempted_host() {
    let config = cluster_config(&["a", "b", "c"]);
    let mut resolver =
        ConnectionResolver::with_shuffle(FakeConnector::refusing_all(), NoShuffle);

    let error = resolver
        .resolve(&config)
        .expect_err("no host accepts connections");

    let ConnectError::Exhausted { attempts } = &error;
    assert_eq!(attempts.len(), 3);
    assert_eq!(error.attempted_hosts(), vec!["a", "b", "c"]);
    assert!(
        attempts[2].source.to_string().contains("refused by c"),
        "last attempt must keep its transport error"
    );

    let message = error.to_string();
    assert!(message.contains("all 3 candidate host(s) failed [a, b, c]"));
    assert!(message.contains("last error from host `c`"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn single_host_config_is_a_one_element_list() {
    let config = ConnectionConfig::new(HostList::single("localhost"), "app");
    let mut resolver = ConnectionResolver::new(FakeConnector::accepting(["localhost"]));

    let connection = resolver.resolve(&config).expect("single host accepts");

    assert_eq!(connection.host(), "localhost");
    assert_eq!(resolver.connector().attempts().len(), 1);
}

#[test]
fn race_policy_finds_the_accepting_host() {
    let config = cluster_config(&["a", "b", "c", "d", "e"]);
    let max_in_flight = NonZeroUsize::new(2).expect("non-zero");

    for seed in 0..16 {
        let mut resolver = ConnectionResolver::with_shuffle(
            FakeConnector::accepting(["d"]),
            RandomShuffle::seeded(seed),
        )
        .policy(ResolvePolicy::Race { max_in_flight });

        let connection = resolver.resolve(&config).expect("d accepts");

        assert_eq!(connection.host(), "d");
    }
}

#[test]
fn race_policy_returns_the_first_host_to_answer() {
    let config = cluster_config(&["a", "b"]);
    let connector = TimedConnector::new()
        .refuses("a", Duration::from_secs(3))
        .accepts("b", Duration::ZERO);
    let mut resolver = ConnectionResolver::with_shuffle(connector, NoShuffle).policy(
        ResolvePolicy::Race {
            max_in_flight: NonZeroUsize::new(2).expect("non-zero"),
        },
    );

    let started = Instant::now();
    let connection = resolver.resolve(&config).expect("b accepts");

    assert_eq!(connection.host(), "b");
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "a hung host must not delay the winner, took {:?}",
        started.elapsed()
    );
}

#[test]
fn race_policy_closes_every_surplus_handle() {
    let config = cluster_config(&["a", "b", "c"]);
    let connector = TimedConnector::new()
        .accepts("a", Duration::from_millis(200))
        .accepts("b", Duration::ZERO)
        .accepts("c", Duration::from_millis(100));
    let mut resolver = ConnectionResolver::with_shuffle(connector, NoShuffle).policy(
        ResolvePolicy::Race {
            max_in_flight: NonZeroUsize::new(3).expect("non-zero"),
        },
    );

    let connection = resolver.resolve(&config).expect("every host accepts");
    assert_eq!(connection.host(), "b");

    let connector = resolver.connector();
    assert_eq!(connector.wait_for_drops(2, Duration::from_secs(5)), 2);
    assert_eq!(connection.handle().host, "b");

    drop(connection);
    assert_eq!(connector.dropped_handles(), 3);
}

#[test]
fn race_policy_never_exceeds_max_in_flight() {
    let hosts = ["a", "b", "c", "d", "e"];
    let config = cluster_config(&hosts);
    let connector = hosts.iter().fold(TimedConnector::new(), |connector, host| {
        connector.refuses(host, Duration::from_millis(30))
    });
    let mut resolver = ConnectionResolver::with_shuffle(connector, NoShuffle).policy(
        ResolvePolicy::Race {
            max_in_flight: NonZeroUsize::new(2).expect("non-zero"),
        },
    );

    let error = resolver.resolve(&config).expect_err("nothing accepts");

    assert_eq!(error.attempted_hosts(), hosts);
    assert!(resolver.connector().peak_in_flight() <= 2);
}

#[test]
fn race_policy_exhaustion_keeps_all_attempts() {
    let config = cluster_config(&["a", "b", "c"]);
    let mut resolver =
        ConnectionResolver::with_shuffle(FakeConnector::refusing_all(), NoShuffle).policy(
            ResolvePolicy::Race {
                max_in_flight: NonZeroUsize::new(2).expect("non-zero"),
            },
        );

    let error = resolver.resolve(&config).expect_err("nothing accepts");

    assert_eq!(error.attempted_hosts(), vec!["a", "b", "c"]);
}
