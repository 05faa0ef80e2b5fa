#![deny(unsafe_code, rust_2018_idioms)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::panic,
    clippy::unseparated_literal_suffix,
    clippy::unwrap_used
)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::option_if_let_else,
    clippy::significant_drop_tightening,
    clippy::use_self
)]

//! Signal-driven graceful shutdown for long-running services.
//!
//! A [`Death`] coordinator subscribes to a set of OS termination signals at
//! construction. [`Death::wait_for_death`] blocks until one of them arrives
//! (or [`Death::fall_on_sword`] requests shutdown manually), then closes the
//! caller's resources concurrently within a bounded time budget
//! ([`DEFAULT_TIMEOUT`] unless overridden). Resources that overrun the
//! budget are abandoned rather than canceled, keeping shutdown latency
//! bounded.
//!
//! ```no_run
//! use deathwatch::{Death, SignalKind};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), deathwatch::Error> {
//! let death = Death::new(&[SignalKind::terminate(), SignalKind::hangup()])?;
//! // ... start serving ...
//! death.wait_for_death(Vec::new()).await;
//! # Ok(())
//! # }
//! ```

mod closeable;
mod coordinator;
pub mod error;
mod logging;
mod signals;
mod trigger;

pub use closeable::{BoxError, Closeable};
pub use coordinator::{Death, DEFAULT_TIMEOUT};
pub use error::{Error, LogError};
pub use logging::{Logger, TracingLogger};
pub use signals::default_signals;
pub use tokio::signal::unix::SignalKind;
