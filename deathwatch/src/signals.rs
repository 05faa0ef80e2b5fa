use crate::error::Error;
use crate::logging::LoggerHandle;
use crate::trigger::Trigger;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};

/// The conventional termination set: SIGTERM and SIGINT.
#[must_use]
pub fn default_signals() -> [SignalKind; 2] {
    [SignalKind::terminate(), SignalKind::interrupt()]
}

/// Routes each watched OS signal into a `raise` on the trigger.
///
/// One watcher task per signal; a delivery raises the trigger exactly once,
/// and redundant wakes collapse inside the trigger. Registration is
/// permanent for the life of the runtime; restoring default signal handling
/// is out of scope.
pub(crate) fn subscribe(
    kinds: &[SignalKind],
    trigger: &Arc<Trigger>,
    logger: &LoggerHandle,
) -> Result<(), Error> {
    logger.debug(format_args!("subscribing to {}", describe(kinds)));
    for &kind in kinds {
        let mut stream = signal(kind)?;
        let trigger = Arc::clone(trigger);
        let logger = logger.clone();
        tokio::spawn(async move {
            while stream.recv().await.is_some() {
                logger.info(format_args!(
                    "received {}, shutdown requested",
                    signal_name(kind)
                ));
                trigger.raise();
            }
        });
    }
    Ok(())
}

pub(crate) fn signal_name(kind: SignalKind) -> Cow<'static, str> {
    let known = [
        (SignalKind::alarm(), "SIGALRM"),
        (SignalKind::child(), "SIGCHLD"),
        (SignalKind::hangup(), "SIGHUP"),
        (SignalKind::interrupt(), "SIGINT"),
        (SignalKind::io(), "SIGIO"),
        (SignalKind::pipe(), "SIGPIPE"),
        (SignalKind::quit(), "SIGQUIT"),
        (SignalKind::terminate(), "SIGTERM"),
        (SignalKind::user_defined1(), "SIGUSR1"),
        (SignalKind::user_defined2(), "SIGUSR2"),
        (SignalKind::window_change(), "SIGWINCH"),
    ];
    match known.iter().find(|(k, _)| *k == kind) {
        Some(&(_, name)) => Cow::Borrowed(name),
        None => Cow::Owned(format!("signal {}", kind.as_raw_value())),
    }
}

fn describe(kinds: &[SignalKind]) -> String {
    kinds
        .iter()
        .map(|&kind| signal_name(kind))
        .collect::<Vec<_>>()
        .join(", ")
}
