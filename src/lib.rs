//! qinfang - Scheduled practice-room booking sniper
//!
//! Automates submission of room-booking requests against a university
//! facility-booking portal at a precise scheduled instant, retrying rapidly
//! until the server returns a terminal outcome.
//!
//! # Architecture
//!
//! - [`config`] - App configuration (TOML), run configuration and validation
//! - [`booking`] - Domain core: places table, slot splitter, response
//!   classification, and the HTTP booking client
//! - [`scheduler`] - Single-shot wall-clock timer with an idempotent start latch
//! - [`coordinator`] - Per-chunk retry loops and batch event aggregation
//! - [`error`] - Unified error type
//!
//! # Example
//!
//! ```no_run
//! use qinfang::booking::{build_chunks, BookingClient};
//! use qinfang::config::AppConfig;
//! use qinfang::coordinator::BatchCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cfg = AppConfig::load("config.toml")?;
//!     let chunks = build_chunks(&cfg.requests)?;
//!     let client = BookingClient::new(cfg.run_config()?)?;
//!     let coordinator = BatchCoordinator::new(client);
//!     let mut events = coordinator.spawn(chunks);
//!     while let Some(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod booking;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod scheduler;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::booking::{
        build_chunks, BookingChunk, BookingClient, Outcome, PopupLevel,
    };
    pub use crate::config::{AppConfig, ProxyConfig, RunConfig, UserProfile};
    pub use crate::coordinator::{BatchCoordinator, BookingEvent};
    pub use crate::error::{Error, Result};
    pub use crate::scheduler::{Scheduler, StartLatch};
}
