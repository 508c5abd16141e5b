//! Single-shot batch scheduling
//!
//! The portal opens a booking window at a fixed local wall-clock instant; the
//! scheduler arms one timer for that instant and fires the batch exactly
//! once. Two rules keep it honest:
//!
//! - re-scheduling cancels any previously armed timer (only the latest
//!   target counts), and
//! - firing goes through a single-use [`StartLatch`], so no combination of
//!   timers or manual triggers can start the same run twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Wall-clock target format
pub const TARGET_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Single-use start guard for one run.
///
/// The first `try_acquire` wins; every later call returns `false` until
/// `reset` opens the latch for a new run.
#[derive(Debug, Default)]
pub struct StartLatch {
    started: AtomicBool,
}

impl StartLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the start. Returns `true` exactly once per run.
    pub fn try_acquire(&self) -> bool {
        !self.started.swap(true, Ordering::SeqCst)
    }

    /// Whether the run has started
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Open the latch for a new run
    pub fn reset(&self) {
        self.started.store(false, Ordering::SeqCst);
    }
}

/// Arms a single-shot timer toward a `"YYYY-MM-DD HH:MM:SS"` local target
pub struct Scheduler {
    armed: Option<JoinHandle<()>>,
    latch: Arc<StartLatch>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            armed: None,
            latch: Arc::new(StartLatch::new()),
        }
    }

    /// Shared handle to the run's start latch
    pub fn latch(&self) -> Arc<StartLatch> {
        Arc::clone(&self.latch)
    }

    /// Delay from now until the target instant; zero if it already passed
    pub fn delay_until(target_time: &str) -> Result<Duration> {
        let target = NaiveDateTime::parse_from_str(target_time.trim(), TARGET_FORMAT)
            .map_err(|e| Error::scheduler(format!("bad target time {target_time:?}: {e}")))?;
        let delta = target - Local::now().naive_local();
        Ok(delta.to_std().unwrap_or(Duration::ZERO))
    }

    /// Arm the timer. `run_immediately` (or an already-passed target) fires
    /// `on_fire` right away; otherwise it fires once when the target instant
    /// elapses. A previously armed timer is cancelled first, and the start
    /// latch guarantees at most one fire per run no matter how often this is
    /// called.
    pub fn schedule<F, Fut>(
        &mut self,
        target_time: &str,
        run_immediately: bool,
        on_fire: F,
    ) -> Result<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = if run_immediately {
            Duration::ZERO
        } else {
            Self::delay_until(target_time)?
        };

        if delay.is_zero() {
            tracing::info!("firing batch now");
        } else {
            tracing::info!("batch armed for {target_time} (in {delay:?})");
        }

        let latch = Arc::clone(&self.latch);
        self.armed = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if latch.try_acquire() {
                on_fire().await;
            }
        }));

        Ok(())
    }

    /// Cancel an armed timer, if any. A run that already fired is unaffected.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.armed.take() {
            handle.abort();
        }
    }

    /// Cancel and re-open the latch for a fresh run
    pub fn reset(&mut self) {
        self.cancel();
        self.latch.reset();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
