//! Cooperative shutdown signal shared by the background loops.
//!
//! Loops wait on [`Shutdown::wait_timeout`] instead of sleeping, so a
//! trigger wakes them immediately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct State {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

/// Cloneable handle to a one-shot shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    state: Arc<State>,
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Sets the flag and wakes every waiter. Idempotent.
    pub fn trigger(&self) {
        let mut triggered = self.state.triggered.lock();
        if !*triggered {
            *triggered = true;
            tracing::info!("shutdown requested");
        }
        self.state.condvar.notify_all();
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool { *self.state.triggered.lock() }

    /// Blocks for up to `timeout` or until shutdown is triggered.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut triggered = self.state.triggered.lock();

        while !*triggered {
            match deadline {
                Some(deadline) => {
                    if self.state.condvar.wait_until(&mut triggered, deadline).timed_out() {
                        break;
                    }
                }
                None => self.state.condvar.wait(&mut triggered),
            }
        }

        *triggered
    }

    /// Triggers this shutdown on Ctrl-C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if a handler is already installed for the process.
    pub fn install_signal_handler(&self) -> Result<(), ctrlc::Error> {
        let shutdown = self.clone();
        ctrlc::set_handler(move || shutdown.trigger())
    }
}
