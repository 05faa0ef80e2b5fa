//! End-to-end tests that deliver real POSIX signals to the test process.
//!
//! Tests in this binary run concurrently in one process, and a raised signal
//! wakes every registered watcher of that signal number, so each test here
//! watches a signal no other test uses.

use deathwatch::{BoxError, Closeable, Death, SignalKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing_subscriber::filter::LevelFilter;

/// Routes the default `TracingLogger` output somewhere visible. Safe to
/// call from every test; only the first registration wins.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}

fn deliver(signal: libc::c_int) {
    // SAFETY: raising a signal in our own process.
    unsafe {
        libc::kill(libc::getpid(), signal);
    }
}

#[derive(Default)]
struct CloseMe {
    closed: AtomicUsize,
}

impl Closeable for CloseMe {
    fn name(&self) -> &str {
        "close_me"
    }

    fn close(&self) -> Result<(), BoxError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct NeverClose;

impl Closeable for NeverClose {
    fn name(&self) -> &str {
        "never_close"
    }

    fn close(&self) -> Result<(), BoxError> {
        std::thread::sleep(Duration::from_secs(120));
        Ok(())
    }
}

/// Backed by an unordered map; neither `Eq` nor `Hash`. The coordinator
/// tracks resources by position, so this must work like any other resource.
#[derive(Default)]
struct Unordered {
    entries: HashMap<String, Vec<u8>>,
}

impl Closeable for Unordered {
    fn name(&self) -> &str {
        "unordered"
    }

    fn close(&self) -> Result<(), BoxError> {
        assert!(self.entries.is_empty());
        Ok(())
    }
}

#[tokio::test]
async fn sigterm_closes_an_unordered_resource() {
    init_tracing();
    let death = Death::new(&[SignalKind::terminate()]).unwrap();
    deliver(libc::SIGTERM);
    timeout(
        Duration::from_secs(5),
        death.wait_for_death([Arc::new(Unordered::default()) as Arc<dyn Closeable>]),
    )
    .await
    .expect("wait_for_death should return after SIGTERM");
}

#[tokio::test]
async fn sighup_with_no_resources_returns_promptly() {
    init_tracing();
    let death = Death::new(&[SignalKind::hangup()]).unwrap();
    deliver(libc::SIGHUP);
    timeout(Duration::from_secs(5), death.wait_for_death(Vec::new()))
        .await
        .expect("wait_for_death should return after SIGHUP");
}

#[tokio::test]
async fn sigusr1_closes_the_resource_exactly_once() {
    init_tracing();
    let death = Death::new(&[SignalKind::user_defined1()]).unwrap();
    let close_me = Arc::new(CloseMe::default());
    deliver(libc::SIGUSR1);
    timeout(
        Duration::from_secs(5),
        death.wait_for_death([Arc::clone(&close_me) as Arc<dyn Closeable>]),
    )
    .await
    .expect("wait_for_death should return after SIGUSR1");
    assert_eq!(close_me.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sigusr2_gives_up_on_a_slow_resource_but_closes_the_fast_one() {
    init_tracing();
    let mut death = Death::new(&[SignalKind::user_defined2()]).unwrap();
    death.set_timeout(Duration::from_millis(10));
    let close_me = Arc::new(CloseMe::default());
    deliver(libc::SIGUSR2);

    let started = Instant::now();
    timeout(
        Duration::from_secs(5),
        death.wait_for_death([
            Arc::new(NeverClose) as Arc<dyn Closeable>,
            Arc::clone(&close_me) as Arc<dyn Closeable>,
        ]),
    )
    .await
    .expect("wait_for_death should give up at the timeout");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(close_me.closed.load(Ordering::SeqCst), 1);
}
