use std::{
    collections::BTreeMap,
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use roachql_core::{BoxError, ConnectionConfig, Connector};

/// Handle that counts its own drops in the connector that produced it.
#[derive(Debug)]
pub struct CountedHandle {
    pub host: String,
    drops: Arc<AtomicUsize>,
}

impl Drop for CountedHandle {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    delay: Duration,
    accept: bool,
}

/// Connector whose hosts answer after a fixed delay. Unplanned hosts refuse.
#[derive(Debug, Default)]
pub struct TimedConnector {
    plans: BTreeMap<String, Plan>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    drops: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl TimedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accepts(self, host: &str, delay: Duration) -> Self {
        self.plan(host, delay, true)
    }

    pub fn refuses(self, host: &str, delay: Duration) -> Self {
        self.plan(host, delay, false)
    }

    fn plan(mut self, host: &str, delay: Duration, accept: bool) -> Self {
        self.plans.insert(host.to_string(), Plan { delay, accept });
        self
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn dropped_handles(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }

    /// Polls until `expected` handles have been dropped or `timeout` passes.
    pub fn wait_for_drops(&self, expected: usize, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        while self.dropped_handles() < expected && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        self.dropped_handles()
    }
}

impl Connector for TimedConnector {
    type Handle = CountedHandle;

    fn connect(&self, config: &ConnectionConfig) -> Result<Self::Handle, BoxError> {
        let host = config.host.first().to_string();
        let plan = self.plans.get(&host).copied().unwrap_or(Plan {
            delay: Duration::ZERO,
            accept: false,
        });

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        thread::sleep(plan.delay);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if plan.accept {
            Ok(CountedHandle {
                host,
                drops: Arc::clone(&self.drops),
            })
        } else {
            Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("connection refused by {host}"),
            )))
        }
    }
}
