use crate::closeable::{BoxError, Closeable};
use crate::error::Error;
use crate::logging::{Logger, LoggerHandle, TracingLogger};
use crate::signals;
use crate::trigger::Trigger;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::signal::unix::SignalKind;
use tokio::sync::mpsc;
use tokio::time;

/// How long `wait_for_death` waits for resources to finish closing before
/// it gives up, unless overridden with [`Death::set_timeout`]. This bounds
/// user-observable shutdown latency, so treat changes as breaking.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

type CloseReport = (usize, String, Result<Result<(), BoxError>, Box<dyn Any + Send>>);

/// Shutdown coordinator.
///
/// Subscribes to a set of OS signals at construction, then blocks in
/// [`wait_for_death`](Self::wait_for_death) until one of them arrives (or
/// [`fall_on_sword`](Self::fall_on_sword) is called) and closes the given
/// resources concurrently, bounded by the configured timeout. Resources
/// still closing when the timeout elapses are abandoned, not canceled; their
/// close calls keep running on detached threads. That leak is the price of
/// bounded shutdown latency.
pub struct Death {
    trigger: Arc<Trigger>,
    timeout: Duration,
    logger: LoggerHandle,
}

impl Death {
    /// Creates a coordinator watching exactly the given signals.
    ///
    /// Must be called from within a tokio runtime; signal watcher tasks are
    /// spawned here. Fails if the OS refuses a signal registration.
    pub fn new(watched: &[SignalKind]) -> Result<Self, Error> {
        let trigger = Arc::new(Trigger::new());
        let logger = LoggerHandle::new(Arc::new(TracingLogger));
        signals::subscribe(watched, &trigger, &logger)?;
        Ok(Self { trigger, timeout: DEFAULT_TIMEOUT, logger })
    }

    /// Creates a coordinator watching [`default_signals`](crate::default_signals).
    pub fn with_default_signals() -> Result<Self, Error> {
        Self::new(&signals::default_signals())
    }

    /// Replaces the close-phase time budget. Call before `wait_for_death`.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Replaces the logger. Call before `wait_for_death`; may be called
    /// repeatedly, and the signal watcher tasks pick up the replacement.
    pub fn set_logger(&mut self, logger: Arc<dyn Logger>) {
        self.logger.replace(logger);
    }

    /// Requests shutdown without an external signal, as if one had been
    /// delivered. Safe to call any number of times, from any thread, before
    /// or after a wait call has returned; never blocks.
    pub fn fall_on_sword(&self) {
        self.trigger.raise();
    }

    /// Blocks until shutdown is requested, then closes all `resources`
    /// concurrently and returns once every close has finished or the
    /// timeout has elapsed, whichever comes first.
    ///
    /// A resource whose close fails or panics is logged and does not affect
    /// the others; the call itself always returns normally.
    pub async fn wait_for_death<I>(&self, resources: I)
    where
        I: IntoIterator<Item = Arc<dyn Closeable>>,
    {
        self.trigger.wait().await;
        let resources: Vec<_> = resources.into_iter().collect();
        self.logger.info(format_args!(
            "shutdown requested, closing {} resource(s)",
            resources.len()
        ));
        self.close_all(resources).await;
    }

    /// Blocks until shutdown is requested, then runs `cleanup` synchronously
    /// and returns. The single callback is the entire close phase; there is
    /// no fan-out and no timeout race.
    pub async fn wait_for_death_with_func<F>(&self, cleanup: F)
    where
        F: FnOnce(),
    {
        self.trigger.wait().await;
        self.logger.info(format_args!("shutdown requested, running cleanup"));
        cleanup();
    }

    /// Fan-out: one detached thread per resource, results aggregated over a
    /// channel and raced against the timeout. Threads are never joined;
    /// stragglers outlive the race on purpose.
    async fn close_all(&self, resources: Vec<Arc<dyn Closeable>>) {
        if resources.is_empty() {
            return;
        }
        let (tx, mut rx) = mpsc::unbounded_channel::<CloseReport>();
        for (index, resource) in resources.into_iter().enumerate() {
            let tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("close-{index}"))
                .spawn(move || {
                    let name = resource.name().to_owned();
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| resource.close()));
                    let _ = tx.send((index, name, outcome));
                });
            if let Err(err) = spawned {
                self.logger.error(format_args!(
                    "failed to spawn close thread for resource #{index}: {err}"
                ));
            }
        }
        drop(tx);

        // The channel closes once every close thread has reported.
        let drain = async {
            while let Some((index, name, outcome)) = rx.recv().await {
                match outcome {
                    Ok(Ok(())) => self
                        .logger
                        .debug(format_args!("closed {name} (resource #{index})")),
                    Ok(Err(reason)) => self.logger.warn(format_args!(
                        "failed to close {name} (resource #{index}): {reason}"
                    )),
                    Err(payload) => self.logger.error(format_args!(
                        "close of {name} (resource #{index}) panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                }
            }
        };
        if time::timeout(self.timeout, drain).await.is_err() {
            self.logger.warn(format_args!(
                "gave up waiting for resources to close after {:?}",
                self.timeout
            ));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
