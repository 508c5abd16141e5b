//! Batch coordination: one retry loop per chunk
//!
//! The coordinator owns a run: it spawns one tokio task per booking chunk,
//! funnels their log lines and popups into a single event channel, and emits
//! `Finished` exactly once after every loop has reached a terminal outcome or
//! honored cancellation.
//!
//! Each retry loop is a tight poll: submit, classify, and either stop on a
//! terminal substring or sleep one fixed backoff interval and go again. The
//! interval is small and constant on purpose — the loops race a booking
//! window that opens at a scheduled instant, so attempt rate matters and
//! exponential backoff would be counterproductive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinSet;

use crate::booking::{BookingChunk, BookingClient, Outcome, PopupLevel};

/// Fixed inter-attempt delay
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

/// Events a running batch emits toward the front end
#[derive(Debug, Clone)]
pub enum BookingEvent {
    /// One line per attempt (plus a start line per chunk)
    Log(String),
    /// Exactly one per chunk, at its terminal transition
    Popup { level: PopupLevel, message: String },
    /// Exactly one per run, after all chunks are terminal or cancelled
    Finished,
}

/// Supervises the per-chunk retry loops of one run
pub struct BatchCoordinator {
    client: Arc<BookingClient>,
    backoff: Duration,
    stop: Arc<AtomicBool>,
}

impl BatchCoordinator {
    pub fn new(client: BookingClient) -> Self {
        Self {
            client: Arc::new(client),
            backoff: DEFAULT_BACKOFF,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the inter-attempt backoff (tests use a shorter one)
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Request cooperative cancellation of every running loop.
    ///
    /// Loops observe the flag within one backoff interval; an in-flight
    /// attempt is allowed to complete. `Finished` still fires.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Start one retry loop per chunk and return the aggregated event stream.
    ///
    /// Loops run concurrently and independently; no ordering is imposed
    /// across chunks. The receiver yields `Finished` as its last event.
    pub fn spawn(&self, chunks: Vec<BookingChunk>) -> UnboundedReceiver<BookingEvent> {
        let (events, receiver) = mpsc::unbounded_channel();

        let mut workers = JoinSet::new();
        for chunk in chunks {
            let client = Arc::clone(&self.client);
            let stop = Arc::clone(&self.stop);
            let events = events.clone();
            let backoff = self.backoff;
            workers.spawn(run_chunk(client, chunk, stop, events, backoff));
        }

        tokio::spawn(async move {
            let mut terminal = 0usize;
            let mut cancelled = 0usize;
            while let Some(result) = workers.join_next().await {
                match result {
                    Ok(Some(_)) => terminal += 1,
                    Ok(None) => cancelled += 1,
                    // A defect in one loop must not take down its siblings.
                    Err(e) => {
                        tracing::error!("booking loop aborted: {e}");
                        cancelled += 1;
                    }
                }
            }
            tracing::info!("batch finished: {terminal} terminal, {cancelled} cancelled");
            let _ = events.send(BookingEvent::Finished);
        });

        receiver
    }
}

/// Retry-until-terminal loop for a single chunk.
///
/// Returns the terminal outcome, or `None` when cancelled before one was
/// observed.
async fn run_chunk(
    client: Arc<BookingClient>,
    chunk: BookingChunk,
    stop: Arc<AtomicBool>,
    events: UnboundedSender<BookingEvent>,
    backoff: Duration,
) -> Option<Outcome> {
    let _ = events.send(BookingEvent::Log(format!("开始预定：{chunk}")));

    loop {
        if stop.load(Ordering::SeqCst) {
            tracing::info!("cancelled: {chunk}");
            return None;
        }

        // Every failure becomes a log line; nothing escapes the loop.
        let message = match client.submit(&chunk).await {
            Ok(message) => message,
            Err(e) => format!("异常：{e}"),
        };
        let _ = events.send(BookingEvent::Log(format!("返回：{message}")));

        if let Some(outcome) = Outcome::classify(&message) {
            let popup = outcome.popup_text(&chunk);
            match outcome.level() {
                PopupLevel::Info => tracing::info!("{popup}"),
                PopupLevel::Warn => tracing::warn!("{popup}"),
                PopupLevel::Error => tracing::error!("{popup}"),
            }
            let _ = events.send(BookingEvent::Popup {
                level: outcome.level(),
                message: popup,
            });
            return Some(outcome);
        }

        tokio::time::sleep(backoff).await;
    }
}
