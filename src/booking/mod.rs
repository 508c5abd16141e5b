//! Booking domain core
//!
//! - [`places`] - static place → facility-id table
//! - [`slots`] - time-range splitting into ≤2h chunks
//! - [`outcome`] - response classification and popup levels
//! - [`client`] - the HTTP booking client (one POST per attempt)
//!
//! [`build_chunks`] turns the user's raw request rows into validated,
//! submission-ready [`BookingChunk`]s.

pub mod client;
pub mod outcome;
pub mod places;
pub mod slots;

pub use client::BookingClient;
pub use outcome::{Outcome, PopupLevel};

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::BookingRequest;
use crate::error::{Error, Result};

/// Timestamp format the portal expects in form fields and logs
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Earliest bookable time of day
const DAY_OPEN: (u32, u32) = (6, 0);
/// Latest bookable time of day
const DAY_CLOSE: (u32, u32) = (23, 0);

/// One submission-ready booking: a single place over a same-day range of at
/// most [`slots::MAX_SLOT_MINUTES`] minutes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingChunk {
    pub place: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BookingChunk {
    /// Start timestamp in portal wire format
    pub fn start_ts(&self) -> String {
        self.start.format(TS_FORMAT).to_string()
    }

    /// End timestamp in portal wire format
    pub fn end_ts(&self) -> String {
        self.end.format(TS_FORMAT).to_string()
    }
}

impl fmt::Display for BookingChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {} - {}", self.place, self.start_ts(), self.end_ts())
    }
}

/// Build the full chunk list for a run from raw request rows.
///
/// Validates every row before scheduling: parseable date and times, minute
/// granularity, `start <= end`. Any failure rejects the whole run. Ranges
/// outside the portal's 06:00–23:00 window are allowed through with a
/// warning; the portal is the authority on its own opening hours.
pub fn build_chunks(requests: &[BookingRequest]) -> Result<Vec<BookingChunk>> {
    let mut chunks = Vec::new();
    for (idx, req) in requests.iter().enumerate() {
        let row = idx + 1;
        if req.place.trim().is_empty() {
            return Err(Error::invalid_request(format!("row {row}: place is empty")));
        }

        let date = parse_date(&req.date, row)?;
        let start = parse_time(&req.start, row)?;
        let end = parse_time(&req.end, row)?;
        if end < start {
            return Err(Error::invalid_request(format!(
                "row {row}: end {} is before start {}",
                req.end, req.start
            )));
        }

        let open = NaiveTime::from_hms_opt(DAY_OPEN.0, DAY_OPEN.1, 0).unwrap();
        let close = NaiveTime::from_hms_opt(DAY_CLOSE.0, DAY_CLOSE.1, 0).unwrap();
        if start < open || end > close {
            tracing::warn!(
                "row {row}: {}-{} is outside the portal's {:02}:00-{:02}:00 window",
                req.start,
                req.end,
                DAY_OPEN.0,
                DAY_CLOSE.0
            );
        }

        for (slot_start, slot_end) in slots::split_slots(start, end, slots::MAX_SLOT_MINUTES) {
            chunks.push(BookingChunk {
                place: req.place.clone(),
                start: date.and_time(slot_start),
                end: date.and_time(slot_end),
            });
        }
    }
    Ok(chunks)
}

fn parse_date(raw: &str, row: usize) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| Error::invalid_request(format!("row {row}: bad date {raw:?}: {e}")))
}

fn parse_time(raw: &str, row: usize) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|e| Error::invalid_request(format!("row {row}: bad time {raw:?}: {e}")))
}
