use std::{
    io,
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc,
        mpsc::{self, SendError, Sender},
    },
    thread,
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, error, info, info_span, warn};

use crate::{BoxError, ConnectError, Connection, ConnectionConfig, Connector, HostAttempt};

type RaceOutcome<H> = (usize, Result<Connection<H>, BoxError>);

/// Source of the host permutation tried by the resolver.
pub trait HostShuffle {
    fn shuffle(&mut self, hosts: &mut [String]);
}

/// Uniform random permutation, spreading clients across cluster nodes.
#[derive(Debug, Clone)]
pub struct RandomShuffle<R = StdRng> {
    rng: R,
}

impl RandomShuffle<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomShuffle<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomShuffle<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> HostShuffle for RandomShuffle<R> {
    fn shuffle(&mut self, hosts: &mut [String]) {
        hosts.shuffle(&mut self.rng);
    }
}

/// Keeps the configured host order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl HostShuffle for NoShuffle {
    fn shuffle(&mut self, _hosts: &mut [String]) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolvePolicy {
    /// One host at a time, in permutation order.
    #[default]
    Sequential,
    /// Up to `max_in_flight` attempts at once, started in permutation order;
    /// a failure frees its slot for the next host. The first success to
    /// arrive wins. Surplus handles already received are dropped before
    /// `resolve` returns, and attempts still in flight drop theirs on arrival.
    Race { max_in_flight: NonZeroUsize },
}

pub struct ConnectionResolver<C, S = RandomShuffle> {
    connector: Arc<C>,
    shuffle: S,
    policy: ResolvePolicy,
}

impl<C: Connector + 'static> ConnectionResolver<C, RandomShuffle> {
    pub fn new(connector: C) -> Self {
        Self::with_shuffle(connector, RandomShuffle::new())
    }
}

impl<C, S> ConnectionResolver<C, S>
where
    C: Connector + 'static,
    S: HostShuffle,
{
    pub fn with_shuffle(connector: C, shuffle: S) -> Self {
        Self {
            connector: Arc::new(connector),
            shuffle,
            policy: ResolvePolicy::Sequential,
        }
    }

    pub fn policy(mut self, policy: ResolvePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn resolve(
        &mut self,
        config: &ConnectionConfig,
    ) -> Result<Connection<C::Handle>, ConnectError> {
        let span = info_span!(
            "resolve",
            database = %config.database,
            candidates = config.host.len()
        );
        let _entered = span.enter();

        let mut order = config.host.as_slice().to_vec();
        self.shuffle.shuffle(&mut order);
        debug!(order = ?order, "host permutation");

        let outcome = match self.policy {
            ResolvePolicy::Sequential => self.resolve_sequential(config, &order),
            ResolvePolicy::Race { max_in_flight } => {
                self.resolve_race(config, &order, max_in_flight.get())
            }
        };

        match &outcome {
            Ok(connection) => info!(host = connection.host(), "connected"),
            Err(error) => error!(%error, "no candidate host accepted a connection"),
        }
        outcome
    }

    fn resolve_sequential(
        &self,
        config: &ConnectionConfig,
        order: &[String],
    ) -> Result<Connection<C::Handle>, ConnectError> {
        let mut attempts = Vec::with_capacity(order.len());

        for host in order {
            let candidate = config.with_host(host.as_str());
            debug!(host = host.as_str(), "attempting connection");
            match self.connector.connect(&candidate) {
                Ok(handle) => return Ok(Connection::new(handle, candidate)),
                Err(source) => {
                    warn!(host = host.as_str(), error = %source, "connection attempt failed");
                    attempts.push(HostAttempt {
                        host: host.clone(),
                        source,
                    });
                }
            }
        }

        Err(ConnectError::Exhausted { attempts })
    }

    fn resolve_race(
        &self,
        config: &ConnectionConfig,
        order: &[String],
        max_in_flight: usize,
    ) -> Result<Connection<C::Handle>, ConnectError> {
        let (sender, receiver) = mpsc::channel();
        let mut failures = order.iter().map(|_| None).collect::<Vec<Option<HostAttempt>>>();
        let mut queued = order.iter().enumerate();
        let mut in_flight = 0;

        loop {
            while in_flight < max_in_flight {
                let Some((index, host)) = queued.next() else {
                    break;
                };
                debug!(host = host.as_str(), "attempting connection");
                let candidate = config.with_host(host.as_str());
                match self.spawn_attempt(index, candidate, sender.clone()) {
                    Ok(()) => in_flight += 1,
                    Err(source) => {
                        warn!(
                            host = host.as_str(),
                            error = %source,
                            "could not start connection attempt"
                        );
                        failures[index] = Some(HostAttempt {
                            host: host.clone(),
                            source: Box::new(source),
                        });
                    }
                }
            }
            if in_flight == 0 {
                break;
            }

            let Ok((index, outcome)) = receiver.recv() else {
                break;
            };
            in_flight -= 1;
            match outcome {
                Ok(connection) => {
                    for (_, surplus) in receiver.try_iter() {
                        if let Ok(surplus) = surplus {
                            debug!(host = surplus.host(), "closing surplus raced connection");
                            drop(surplus);
                        }
                    }
                    return Ok(connection);
                }
                Err(source) => {
                    let host = &order[index];
                    warn!(host = host.as_str(), error = %source, "connection attempt failed");
                    failures[index] = Some(HostAttempt {
                        host: host.clone(),
                        source,
                    });
                }
            }
        }

        Err(ConnectError::Exhausted {
            attempts: failures.into_iter().flatten().collect(),
        })
    }

    fn spawn_attempt(
        &self,
        index: usize,
        candidate: ConnectionConfig,
        sender: Sender<RaceOutcome<C::Handle>>,
    ) -> io::Result<()> {
        let connector = Arc::clone(&self.connector);

        thread::Builder::new()
            .name(format!("roachql-connect-{index}"))
            .spawn(move || {
                let attempt = AssertUnwindSafe(|| connector.connect(&candidate));
                let outcome = panic::catch_unwind(attempt)
                    .unwrap_or_else(|_| Err(Box::new(panicked_attempt()) as BoxError))
                    .map(|handle| Connection::new(handle, candidate));

                // Resolution already returned; close the late handle.
                if let Err(SendError((_, Ok(late)))) = sender.send((index, outcome)) {
                    drop(late);
                }
            })
            .map(drop)
    }
}

fn panicked_attempt() -> io::Error {
    io::Error::other("connection attempt panicked")
}
