use crate::error::LogError;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing as log;

/// Leveled logging capability the coordinator emits through.
///
/// Implementations must tolerate concurrent calls from multiple
/// resource-closing threads. `warn` and `error` report a sink outcome;
/// the coordinator ignores it.
pub trait Logger: Send + Sync {
    fn info(&self, args: fmt::Arguments<'_>);
    fn debug(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>) -> Result<(), LogError>;
    fn error(&self, args: fmt::Arguments<'_>) -> Result<(), LogError>;
}

/// Default logger, forwarding to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        log::info!("{}", args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        log::debug!("{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        log::warn!("{}", args);
        Ok(())
    }

    fn error(&self, args: fmt::Arguments<'_>) -> Result<(), LogError> {
        log::error!("{}", args);
        Ok(())
    }
}

/// Swappable shared reference to the coordinator's logger.
///
/// The signal watcher tasks hold clones of this handle, so a logger
/// installed through `set_logger` is observed by them as well.
#[derive(Clone)]
pub(crate) struct LoggerHandle {
    inner: Arc<RwLock<Arc<dyn Logger>>>,
}

impl LoggerHandle {
    pub(crate) fn new(logger: Arc<dyn Logger>) -> Self {
        Self { inner: Arc::new(RwLock::new(logger)) }
    }

    pub(crate) fn replace(&self, logger: Arc<dyn Logger>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = logger;
    }

    fn current(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn info(&self, args: fmt::Arguments<'_>) {
        self.current().info(args);
    }

    pub(crate) fn debug(&self, args: fmt::Arguments<'_>) {
        self.current().debug(args);
    }

    pub(crate) fn warn(&self, args: fmt::Arguments<'_>) {
        let _ = self.current().warn(args);
    }

    pub(crate) fn error(&self, args: fmt::Arguments<'_>) {
        let _ = self.current().error(args);
    }
}
