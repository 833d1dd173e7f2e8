//! Fixed-window admission gate and its window resetter.
//!
//! A [`FixedWindow`] counts accepted requests and rejects once the count
//! reaches the configured limit. A tokio task owned by the instance zeroes
//! the count every window. Both sides go through one `parking_lot::Mutex`.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::{debug, info, trace};
use uuid::Uuid;

use super::backend::RateLimiter;
use crate::config::RateLimiterConfig;
use crate::error::{LimiterError, Result};

/// Lifecycle of a limiter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, never started
    Uninitialized,
    /// Admitting requests; the resetter is active
    Running,
    /// Stopped; every request is rejected
    Stopped,
}

/// Mutable state shared between the gate and its resetter.
struct LimiterState {
    /// Requests accepted in the current window
    counter: u64,
    lifecycle: Lifecycle,
    /// Incremented on every start so a resetter from an earlier run can
    /// never touch the counter of a later one.
    generation: u64,
    resetter: Option<JoinHandle<()>>,
}

impl LimiterState {
    fn is_current(&self, generation: u64) -> bool {
        self.lifecycle == Lifecycle::Running && self.generation == generation
    }
}

/// A fixed-window rate limiter.
///
/// This struct is thread-safe and can be shared across threads and tasks
/// behind an `Arc`.
///
/// Starting the limiter spawns a resetter task that lives until
/// [`stop`](FixedWindow::stop) is called. Dropping a running limiter does
/// **not** stop it: the task keeps firing until the runtime shuts down. Keep
/// a handle to every limiter you start and stop it when it is no longer
/// needed.
pub struct FixedWindow {
    /// Identifies this instance in log output
    id: Uuid,
    config: RateLimiterConfig,
    state: Arc<Mutex<LimiterState>>,
}

impl std::fmt::Debug for FixedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("FixedWindow")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("counter", &state.counter)
            .field("lifecycle", &state.lifecycle)
            .finish()
    }
}

impl FixedWindow {
    /// Create a new, unstarted limiter. Every request is rejected until
    /// [`start`](RateLimiter::start) succeeds.
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            state: Arc::new(Mutex::new(LimiterState {
                counter: 0,
                lifecycle: Lifecycle::Uninitialized,
                generation: 0,
                resetter: None,
            })),
        }
    }

    /// Check whether a request may proceed, counting it if so.
    ///
    /// Rejects when the limiter is not running or the window is full.
    pub fn accept(&self) -> bool {
        let mut state = self.state.lock();

        if state.lifecycle != Lifecycle::Running {
            trace!(limiter = %self.id, lifecycle = ?state.lifecycle, "Rejected, limiter not running");
            return false;
        }

        if state.counter >= self.config.limit {
            trace!(limiter = %self.id, limit = self.config.limit, "Rejected, window is full");
            return false;
        }

        state.counter += 1;
        true
    }

    /// Get the number of requests accepted in the current window.
    pub fn counter(&self) -> u64 {
        self.state.lock().counter
    }

    /// Get the remaining quota for the current window.
    pub fn remaining(&self) -> u64 {
        self.config.limit.saturating_sub(self.counter())
    }

    /// Get the current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lock().lifecycle
    }

    /// Get the configuration this limiter was built with.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Get the instance identifier used in log output.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Validate the configuration and start the resetter on `handle`.
    ///
    /// Useful for callers outside of an async context. On error nothing is
    /// spawned and the state is left untouched.
    ///
    /// Starting a stopped limiter is allowed: the counter is zeroed and a
    /// fresh resetter begins a new window. Starting a running limiter fails
    /// with [`LimiterError::AlreadyRunning`].
    pub fn start_on(&self, handle: &Handle) -> Result<()> {
        self.config.validate()?;
        let window = self.config.window();

        let mut state = self.state.lock();
        if state.lifecycle == Lifecycle::Running {
            return Err(LimiterError::AlreadyRunning);
        }

        // The interval is anchored here so the first window starts now
        let ticker = {
            let _guard = handle.enter();
            let mut ticker = time::interval(window);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        };

        let generation = state.generation + 1;
        state.counter = 0;
        state.generation = generation;
        state.lifecycle = Lifecycle::Running;
        state.resetter = Some(handle.spawn(reset_windows(
            self.id,
            Arc::clone(&self.state),
            generation,
            ticker,
        )));
        drop(state);

        info!(
            limiter = %self.id,
            limit = self.config.limit,
            window = ?window,
            generation = generation,
            "Rate limiter started"
        );
        Ok(())
    }

    /// Stop the limiter.
    ///
    /// Cancels the resetter and makes every later `accept` reject. A no-op
    /// when the limiter is not running.
    pub fn stop(&self) {
        let mut state = self.state.lock();

        if state.lifecycle != Lifecycle::Running {
            debug!(limiter = %self.id, lifecycle = ?state.lifecycle, "Stop ignored, limiter not running");
            return;
        }

        state.lifecycle = Lifecycle::Stopped;
        if let Some(resetter) = state.resetter.take() {
            resetter.abort();
        }
        let counter = state.counter;
        drop(state);

        info!(limiter = %self.id, counter = counter, "Rate limiter stopped");
    }
}

impl RateLimiter for FixedWindow {
    fn accept(&self) -> bool {
        FixedWindow::accept(self)
    }

    /// Start the resetter on the current tokio runtime.
    fn start(&self) -> Result<()> {
        let handle = Handle::try_current().map_err(|_| LimiterError::NoRuntime)?;
        self.start_on(&handle)
    }

    fn stop(&self) {
        FixedWindow::stop(self)
    }
}

/// Zero the counter once per window until the run it belongs to ends.
async fn reset_windows(
    id: Uuid,
    state: Arc<Mutex<LimiterState>>,
    generation: u64,
    mut ticker: Interval,
) {
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let expired = {
            let mut state = state.lock();
            if !state.is_current(generation) {
                break;
            }
            std::mem::take(&mut state.counter)
        };

        debug!(limiter = %id, accepted = expired, "Window reset");
    }

    debug!(limiter = %id, generation = generation, "Resetter exiting");
}
